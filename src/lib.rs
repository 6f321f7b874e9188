//! `har2oapi` - A CLI tool for turning captured HAR traffic into OpenAPI descriptions
//!
//! A run resolves its parameters from hardcoded defaults, up to four optional
//! JSON-with-comments config files and the command line, reads a HAR document
//! from a file or piped standard input, generates an API description and
//! writes it as YAML or JSON.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod har;
pub mod operations;
pub mod system;

use anyhow::Result;
use cli::args::build_command;
use cli::{PARAM_DEFS, ParamDef, ParseOutcome, build_option_schema, parse};
use config::defaults::default_table;
use config::{RunParams, SysPaths, load_layers, resolve};
use error::Har2OapiError;
use generator::{GeneratorConfig, SpecGenerator};
use std::io::Write;
use system::System;
use tracing::{debug, warn};

/// What a resolved command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Generate a document with these parameters
    Run(RunParams),
    /// Print this text (help or version) and exit successfully
    Exit(String),
}

/// Resolve the parameters for this process
///
/// Config layers are loaded before the command line is parsed, so a broken
/// config file stops even `--help`.
///
/// # Errors
///
/// Returns an error if:
/// - The parameter definitions and the default table disagree
/// - The working directory cannot be determined
/// - A config layer exists but is unreadable, malformed or invalid
/// - A known option is used incorrectly on the command line
#[inline]
pub fn resolve_run_params(system: &dyn System, argv: &[String]) -> Result<Invocation> {
    resolve_with_definitions(system, argv, PARAM_DEFS, RunParams::default())
}

/// Resolve the parameters against explicit definitions and defaults
///
/// # Errors
///
/// Same as [`resolve_run_params`]
#[inline]
pub fn resolve_with_definitions(
    system: &dyn System,
    argv: &[String],
    defs: &[ParamDef],
    defaults: RunParams,
) -> Result<Invocation> {
    let schema = build_option_schema(&default_table(&defaults)?, defs)?;

    let paths = SysPaths::discover(system)?;
    let file_layers = load_layers(system, &paths)?;

    let (values, ignored) = match parse(argv, &schema)? {
        ParseOutcome::Help(text) | ParseOutcome::Version(text) => {
            return Ok(Invocation::Exit(text));
        }
        ParseOutcome::Parsed { values, ignored } => (values, ignored),
    };

    if !ignored.is_empty() {
        warn!("Ignoring unrecognized arguments: {}", ignored.join(" "));
    }

    let params = resolve(defs, defaults, file_layers, &values)?;

    // A config file may also ask for help or the version
    let mut command = build_command(&schema);
    if params.help {
        return Ok(Invocation::Exit(command.render_help().to_string()));
    }
    if params.version {
        return Ok(Invocation::Exit(command.render_version()));
    }

    Ok(Invocation::Run(params))
}

/// Log level implied by the resolved parameters
#[must_use]
#[inline]
pub const fn log_level(params: &RunParams) -> &'static str {
    if params.debug {
        "debug"
    } else if params.verbose {
        "info"
    } else {
        "warn"
    }
}

/// Acquire the input, generate the document and write it
///
/// With `configExport` the effective parameters are printed to `stderr` first.
///
/// # Errors
///
/// Returns an error if the input cannot be acquired, generation fails or the
/// output cannot be written
#[inline]
pub fn execute(
    system: &dyn System,
    params: &RunParams,
    generator: &dyn SpecGenerator,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    if params.config_export {
        let exported = serde_json::to_string_pretty(params).map_err(|e| {
            Har2OapiError::configuration(format!("Failed to export configuration: {e}"))
        })?;
        writeln!(stderr, "{exported}").map_err(|e| {
            Har2OapiError::output_write(format!("Failed to export configuration: {e}"))
        })?;
    }

    let har = operations::acquire(system, params)?;

    let config = GeneratorConfig::from(params);
    debug!("Generating with {config:?}");
    let generated = generator.generate(&har, &config)?;
    if let Some(domain) = &generated.domain {
        debug!("Generated document for {domain}");
    }

    operations::write_output(system, params, &generated, stdout)
}

/// Resolve, then execute; help and version text go to `stdout`
///
/// # Errors
///
/// Returns the first error of [`resolve_run_params`] or [`execute`]
#[inline]
pub fn run(
    system: &dyn System,
    argv: &[String],
    generator: &dyn SpecGenerator,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    match resolve_run_params(system, argv)? {
        Invocation::Exit(text) => stdout.write_all(text.as_bytes()).map_err(|e| {
            Har2OapiError::output_write(format!("Failed to write to standard output: {e}")).into()
        }),
        Invocation::Run(params) => execute(system, &params, generator, stdout, stderr),
    }
}
