//! Hardcoded baseline values for every canonical parameter

use crate::config::RunParams;
use crate::error::Har2OapiError;
use anyhow::Result;
use serde_json::{Map, Value};

/// Application name, used for config file locations and `--version`
pub const APP_NAME: &str = "har2oapi";

/// File name of every config layer
pub const CONFIG_FILE_NAME: &str = "config.jsonc";

impl Default for RunParams {
    #[inline]
    fn default() -> Self {
        Self {
            force_all_requests_in_same_spec: false,
            add_servers_to_paths: false,
            guess_authentication_headers: true,
            relaxed_methods: false,
            relaxed_content_type_json_parse: true,
            filter_standard_headers: true,
            log_errors: true,
            attempt_to_parameterize_url: true,
            drop_paths_without_successful_response: true,
            verbose: false,
            debug: false,
            help: false,
            version: false,
            config_export: false,
            output: String::new(),
            format: "yaml".to_owned(),
            stdout: false,
            safe_out: false,
            append: false,
            input: String::new(),
        }
    }
}

/// Flatten run parameters into a table keyed by canonical long name
///
/// The option schema reads each parameter's default, and checks its kind,
/// from this table.
///
/// # Errors
///
/// Returns an error if the parameters do not serialize to a flat object
#[inline]
pub fn default_table(defaults: &RunParams) -> Result<Map<String, Value>> {
    match serde_json::to_value(defaults)? {
        Value::Object(table) => Ok(table),
        other => Err(Har2OapiError::configuration(format!(
            "Default table must be a flat object, got: {other}"
        ))
        .into()),
    }
}
