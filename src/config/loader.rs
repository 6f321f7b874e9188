//! Optional config file loading and lenient (JSON-with-comments) parsing

use crate::config::PartialParams;
use crate::config::schema::validate_against_schema;
use crate::error::Har2OapiError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::io;
use std::path::Path;

/// Load a config file that may legitimately be absent
///
/// A missing or zero-length file yields `Ok(None)`. Any other failure
/// (permission denied, I/O error, a directory in the way) is fatal.
///
/// # Errors
///
/// Returns a configuration error if the file exists but cannot be read
#[inline]
pub fn load_optional(system: &dyn System, path: &Path) -> Result<Option<String>> {
    let len = match system.file_len(path) {
        Ok(len) => len,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(Har2OapiError::configuration(format!(
                "Failed to stat config file {}: {err}",
                path.display()
            ))
            .into());
        }
    };

    if len == 0 {
        return Ok(None);
    }

    system.read_to_string(path).map(Some).map_err(|err| {
        Har2OapiError::configuration(format!(
            "Failed to read config file {}: {err}",
            path.display()
        ))
        .into()
    })
}

/// Parse JSON-with-comments text into a JSON value
///
/// # Errors
///
/// Returns a configuration error if the text is malformed
#[inline]
pub fn parse_lenient_json(text: &str) -> Result<Value> {
    json5::from_str::<Value>(text)
        .map_err(|e| Har2OapiError::configuration(format!("Malformed config: {e}")).into())
}

/// Parse and validate one config layer
///
/// Whitespace-only content is an empty layer, same as a zero-length file.
///
/// # Errors
///
/// Returns a configuration error if the content is malformed or violates the schema
#[inline]
pub fn parse_layer(text: &str, source: &Path) -> Result<PartialParams> {
    if text.trim().is_empty() {
        return Ok(PartialParams::default());
    }

    let value = parse_lenient_json(text)
        .with_context(|| format!("Invalid config layer {}", source.display()))?;
    validate_against_schema(&value)
        .with_context(|| format!("Invalid config layer {}", source.display()))?;

    match value {
        Value::Object(map) => PartialParams::from_map(map),
        _ => Ok(PartialParams::default()),
    }
}
