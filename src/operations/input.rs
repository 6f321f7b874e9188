//! Input acquisition: an explicit HAR file, or piped standard input

use crate::config::RunParams;
use crate::error::Har2OapiError;
use crate::har::{Har, parse_har};
use crate::system::System;
use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source the HAR document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

/// Pick the input source
///
/// An input path wins over piped data. Standard input is only used when no
/// path was resolved and it is not an interactive terminal.
///
/// # Errors
///
/// Returns a no-input error when there is neither a path nor a pipe
#[inline]
pub fn select_source(system: &dyn System, params: &RunParams) -> Result<InputSource> {
    if let Some(path) = params.input_path() {
        return Ok(InputSource::File(path.to_path_buf()));
    }

    if !system.stdin_is_terminal() {
        return Ok(InputSource::Stdin);
    }

    Err(Har2OapiError::no_input(
        "No input file given and nothing piped to standard input. Pass --input <path> or pipe a HAR document.",
    )
    .into())
}

/// Read and parse the HAR document for this run
///
/// Standard input is buffered to completion before parsing starts.
///
/// # Errors
///
/// Returns an error if:
/// - No input source is available
/// - The input file is missing, unreadable or empty
/// - Standard input is empty
/// - The text is not a HAR document
#[inline]
pub fn acquire(system: &dyn System, params: &RunParams) -> Result<Har> {
    let text = match select_source(system, params)? {
        InputSource::File(path) => {
            info!("Reading HAR from {}", path.display());
            read_file(system, &path)?
        }
        InputSource::Stdin => {
            info!("Reading HAR from standard input");
            read_stdin(system)?
        }
    };

    let har = parse_har(&text)?;
    debug!("Parsed HAR with {} entries", har.log.entries.len());
    Ok(har)
}

fn read_file(system: &dyn System, path: &Path) -> Result<String> {
    let text = system.read_to_string(path).map_err(|err| {
        let message = if err.kind() == io::ErrorKind::NotFound {
            format!("Input file does not exist: {}", path.display())
        } else {
            format!("Failed to read input file {}: {err}", path.display())
        };
        Har2OapiError::input(message)
    })?;

    if text.trim().is_empty() {
        return Err(Har2OapiError::input(format!("Input file is empty: {}", path.display())).into());
    }

    Ok(text)
}

fn read_stdin(system: &dyn System) -> Result<String> {
    let text = system
        .read_stdin()
        .map_err(|err| Har2OapiError::input(format!("Failed to read standard input: {err}")))?;

    if text.trim().is_empty() {
        return Err(Har2OapiError::input("Standard input was empty").into());
    }

    Ok(text)
}
