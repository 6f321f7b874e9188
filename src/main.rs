//! # `har2oapi`
//!
//! `har2oapi` turns captured HTTP traffic (HAR files) into OpenAPI descriptions.
//!
//! ## Usage
//!
//! ```sh
//! har2oapi capture.har -o openapi.yaml
//! cat capture.har | har2oapi --format json > openapi.json
//! ```
//!
//! Defaults can be set in `config.jsonc` files (JSON with comments), read in
//! this order, later files winning:
//! - `<install dir>/defaults/config.jsonc`
//! - `/etc/har2oapi/config.jsonc`
//! - `~/.config/har2oapi/config.jsonc`
//! - `./.har2oapi.config.config.jsonc`
//!
//! Command-line options always win over every config file.
//!
//! See `har2oapi --help` for every option.

use har2oapi::error::Har2OapiError;
use har2oapi::generator::HarToOpenApi;
use har2oapi::system::{RealSystem, System as _};
use har2oapi::{Invocation, execute, log_level, resolve_run_params};
use std::io::{self, Write as _};
use tracing::{Level, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

fn main() {
    // Diagnostics go to stderr; stdout carries the generated document
    let (filter, reload_handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let system = RealSystem::new();
    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let params = match resolve_run_params(&system, &argv) {
        Ok(Invocation::Run(params)) => params,
        Ok(Invocation::Exit(text)) => {
            print!("{text}");
            let _ = io::stdout().flush();
            std::process::exit(0);
        }
        Err(err) => fail(&err),
    };

    // RUST_LOG, when set, keeps priority over --verbose and --debug
    if system.env_var("RUST_LOG").is_err() {
        set_log_level(&reload_handle, log_level(&params));
    }

    let generator = match HarToOpenApi::new() {
        Ok(generator) => generator,
        Err(err) => fail(&err),
    };

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr();
    match execute(&system, &params, &generator, &mut stdout, &mut stderr) {
        Ok(()) => std::process::exit(0),
        Err(err) => fail(&err),
    }
}

fn set_log_level(handle: &reload::Handle<EnvFilter, Registry>, level: &str) {
    if let Err(err) = handle.reload(EnvFilter::new(level)) {
        error!("Failed to switch log level to {level}: {err}");
    }
}

/// Report a fatal error and exit; the report survives `RUST_LOG=off`
fn fail(err: &anyhow::Error) -> ! {
    if tracing::enabled!(Level::ERROR) {
        error!("{err:#}");
    } else {
        eprintln!("ERROR {err:#}");
    }
    std::process::exit(
        err.downcast_ref::<Har2OapiError>()
            .map_or(1, Har2OapiError::exit_code),
    );
}
