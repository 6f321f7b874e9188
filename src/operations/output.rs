//! Serialization of the generated document and delivery to a file or stdout

use crate::config::RunParams;
use crate::error::Har2OapiError;
use crate::generator::GeneratedSpec;
use crate::system::System;
use anyhow::Result;
use serde_json::Value;
use std::io::Write;
use std::str::FromStr;
use tracing::{info, warn};

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML, selected by `yaml` or `yml`
    Yaml,
    /// Compact JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = Har2OapiError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(Har2OapiError::unsupported_format(s)),
        }
    }
}

/// Serialize a document in the given format
///
/// The text carries no trailing newline.
///
/// # Errors
///
/// Returns an output error if serialization fails
#[inline]
pub fn serialize(document: &Value, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(document)
            .map_err(|e| Har2OapiError::output_write(format!("Failed to serialize YAML: {e}")))?,
        OutputFormat::Json => serde_json::to_string(document)
            .map_err(|e| Har2OapiError::output_write(format!("Failed to serialize JSON: {e}")))?,
    };

    Ok(text.trim_end_matches('\n').to_owned())
}

/// Write the generated document where the run parameters say
///
/// With an output path the file is overwritten and gets no trailing newline.
/// Otherwise the text goes to `stdout` followed by a newline.
///
/// # Errors
///
/// Returns an error if:
/// - The format is not `yaml`, `yml` or `json` (nothing is written)
/// - Serialization fails
/// - The destination cannot be written
#[inline]
pub fn write_output(
    system: &dyn System,
    params: &RunParams,
    generated: &GeneratedSpec,
    stdout: &mut dyn Write,
) -> Result<()> {
    let format = params.format.parse::<OutputFormat>()?;
    let text = serialize(&generated.spec, format)?;

    let Some(path) = params.output_path() else {
        info!("Writing {format:?} to standard output");
        writeln!(stdout, "{text}")
            .and_then(|()| stdout.flush())
            .map_err(|e| {
                Har2OapiError::output_write(format!("Failed to write to standard output: {e}"))
            })?;
        return Ok(());
    };

    // safeOut and append have no write policy yet: output always overwrites
    if params.safe_out {
        warn!("safeOut is not supported yet, {} will be overwritten", path.display());
    }
    if params.append {
        warn!("append is not supported yet, {} will be overwritten", path.display());
    }

    system.write(path, text.as_bytes()).map_err(|e| {
        Har2OapiError::output_write(format!("Failed to write {}: {e}", path.display()))
    })?;
    info!("Wrote {format:?} to {}", path.display());

    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "These are unit tests")]
mod tests {
    use super::*;
    use crate::system::MockSystem;
    use serde_json::json;

    fn generated() -> GeneratedSpec {
        GeneratedSpec {
            spec: json!({
                "openapi": "3.0.3",
                "info": { "title": "api.example.com", "version": "1.0.0" },
                "paths": { "/users/{param1}": { "get": { "responses": { "200": { "description": "Status 200" } } } } }
            }),
            domain: Some("api.example.com".to_owned()),
        }
    }

    fn params(format: &str, output: &str) -> RunParams {
        RunParams {
            format: format.to_owned(),
            output: output.to_owned(),
            ..RunParams::default()
        }
    }

    #[test]
    fn format_names() {
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "JSON".parse::<OutputFormat>(),
            Err(Har2OapiError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(Har2OapiError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn yaml_and_json_describe_the_same_document() {
        let document = generated().spec;

        let from_json: Value =
            serde_json::from_str(&serialize(&document, OutputFormat::Json).unwrap()).unwrap();
        let from_yaml: Value =
            serde_yaml::from_str(&serialize(&document, OutputFormat::Yaml).unwrap()).unwrap();

        assert_eq!(from_json, document);
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn stdout_gets_a_trailing_newline() {
        let system = MockSystem::new();
        let mut stdout = Vec::new();

        write_output(&system, &params("json", ""), &generated(), &mut stdout).unwrap();

        let text = String::from_utf8(stdout).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(text.matches('\n').count(), 1, "json is compact");
    }

    #[test]
    fn file_is_overwritten_without_trailing_newline() {
        let system = MockSystem::new()
            .with_file("/out/spec.yaml", b"stale: true\n")
            .unwrap();
        let mut stdout = Vec::new();

        let params = params("yaml", "/out/spec.yaml");
        write_output(&system, &params, &generated(), &mut stdout).unwrap();

        let written = String::from_utf8(system.file_contents("/out/spec.yaml").unwrap()).unwrap();
        assert!(written.contains("openapi: 3.0.3"));
        assert!(!written.ends_with('\n'));
        assert!(!written.contains("stale"));
        assert!(stdout.is_empty());
    }

    #[test]
    fn stdout_flag_wins_over_output_path() {
        let system = MockSystem::new().with_dir("/out").unwrap();
        let mut stdout = Vec::new();
        let params = RunParams {
            stdout: true,
            ..params("yml", "/out/spec.yaml")
        };

        write_output(&system, &params, &generated(), &mut stdout).unwrap();

        assert!(system.file_contents("/out/spec.yaml").is_none());
        assert!(String::from_utf8(stdout).unwrap().contains("title: api.example.com"));
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let system = MockSystem::new().with_dir("/out").unwrap();
        let mut stdout = Vec::new();

        let params = params("xml", "/out/spec.xml");
        let err = write_output(&system, &params, &generated(), &mut stdout).unwrap_err();

        assert!(err.to_string().contains("Unsupported format: xml"));
        assert!(system.file_contents("/out/spec.xml").is_none());
        assert!(stdout.is_empty());
    }

    #[test]
    fn unwritable_destination_is_an_output_error() {
        let system = MockSystem::new();
        let mut stdout = Vec::new();

        let params = params("json", "/missing/dir/spec.json");
        let err = write_output(&system, &params, &generated(), &mut stdout).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Har2OapiError>(),
            Some(Har2OapiError::OutputWrite { .. })
        ));
    }
}
