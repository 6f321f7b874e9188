//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for har2oapi operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Har2OapiError {
    /// Configuration Error - unreadable or malformed config layer, bad parameter schema, bad CLI usage
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// No input file was resolved and standard input is an interactive terminal
    #[error("No input: {message}")]
    NoInput { message: String },

    /// Input Error - input file or stream missing, empty or unreadable
    #[error("Input error: {message}")]
    Input { message: String },

    /// Input Parse Error - the HAR document is malformed
    #[error("Input parse error: {message}")]
    InputParse { message: String },

    /// Unsupported output format
    #[error("Unsupported format: {format}. Use 'yaml', 'yml' or 'json'")]
    UnsupportedFormat { format: String },

    /// Generation Error - the generation engine rejected the document
    #[error("Generation error: {message}")]
    Generation { message: String },

    /// Output Error - serialization or writing failed
    #[error("Output error: {message}")]
    OutputWrite { message: String },
}

impl Har2OapiError {
    /// Get the appropriate exit code for this error type
    ///
    /// Every fatal condition terminates with the same code.
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. }
            | Self::NoInput { .. }
            | Self::Input { .. }
            | Self::InputParse { .. }
            | Self::UnsupportedFormat { .. }
            | Self::Generation { .. }
            | Self::OutputWrite { .. } => 1,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a no-input error
    #[inline]
    pub fn no_input<S: Into<String>>(message: S) -> Self {
        Self::NoInput {
            message: message.into(),
        }
    }

    /// Create an input error
    #[inline]
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create an input parse error
    #[inline]
    pub fn input_parse<S: Into<String>>(message: S) -> Self {
        Self::InputParse {
            message: message.into(),
        }
    }

    /// Create an unsupported format error
    #[inline]
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create a generation error
    #[inline]
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Create an output error
    #[inline]
    pub fn output_write<S: Into<String>>(message: S) -> Self {
        Self::OutputWrite {
            message: message.into(),
        }
    }
}
