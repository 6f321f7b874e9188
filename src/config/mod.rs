//! Configuration management module
//!
//! Handles the flat run parameters, the hardcoded defaults, the optional
//! JSONC config layers and the precedence merge with command-line overrides.

pub mod defaults;
pub mod layer;
pub mod loader;
pub mod paths;
pub mod schema;

pub use layer::{layer, load_layers, resolve};
pub use paths::SysPaths;

use crate::error::Har2OapiError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Effective parameters for a single run
///
/// Built once by the resolver and never mutated afterwards. Field names
/// serialize to the canonical long names used in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParams {
    // Generation behavior
    pub force_all_requests_in_same_spec: bool,
    pub add_servers_to_paths: bool,
    pub guess_authentication_headers: bool,
    pub relaxed_methods: bool,
    pub relaxed_content_type_json_parse: bool,
    pub filter_standard_headers: bool,
    pub log_errors: bool,
    pub attempt_to_parameterize_url: bool,
    pub drop_paths_without_successful_response: bool,

    // Application behavior
    pub verbose: bool,
    pub debug: bool,
    pub help: bool,
    pub version: bool,
    pub config_export: bool,
    pub output: String,
    pub format: String,
    pub stdout: bool,
    pub safe_out: bool,
    pub append: bool,
    pub input: String,
}

impl RunParams {
    /// Input file path, if one was resolved to a non-empty value
    #[must_use]
    #[inline]
    pub fn input_path(&self) -> Option<&Path> {
        (!self.input.is_empty()).then(|| Path::new(&self.input))
    }

    /// Output file path, unless output goes to standard output
    #[must_use]
    #[inline]
    pub fn output_path(&self) -> Option<&Path> {
        (!self.stdout && !self.output.is_empty()).then(|| Path::new(&self.output))
    }
}

/// One configuration layer: every parameter is optional
///
/// A layer only carries the keys its source actually defined, so applying it
/// never resets a value set by a lower-precedence source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_all_requests_in_same_spec: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_servers_to_paths: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guess_authentication_headers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxed_methods: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxed_content_type_json_parse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_standard_headers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_errors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_to_parameterize_url: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_paths_without_successful_response: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_export: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl PartialParams {
    /// Build a layer from a flat object keyed by canonical long names
    ///
    /// # Errors
    ///
    /// Returns an error if a value has the wrong type for its key
    #[inline]
    pub fn from_map(values: Map<String, Value>) -> anyhow::Result<Self> {
        serde_json::from_value(Value::Object(values)).map_err(|e| {
            Har2OapiError::configuration(format!("Invalid parameter value: {e}")).into()
        })
    }

    /// Whether this layer defines no key at all
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite every key this layer defines, leaving the rest of `base` untouched
    #[must_use]
    #[inline]
    pub fn apply_to(self, mut base: RunParams) -> RunParams {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(
            &mut base.force_all_requests_in_same_spec,
            self.force_all_requests_in_same_spec,
        );
        set(&mut base.add_servers_to_paths, self.add_servers_to_paths);
        set(
            &mut base.guess_authentication_headers,
            self.guess_authentication_headers,
        );
        set(&mut base.relaxed_methods, self.relaxed_methods);
        set(
            &mut base.relaxed_content_type_json_parse,
            self.relaxed_content_type_json_parse,
        );
        set(&mut base.filter_standard_headers, self.filter_standard_headers);
        set(&mut base.log_errors, self.log_errors);
        set(
            &mut base.attempt_to_parameterize_url,
            self.attempt_to_parameterize_url,
        );
        set(
            &mut base.drop_paths_without_successful_response,
            self.drop_paths_without_successful_response,
        );
        set(&mut base.verbose, self.verbose);
        set(&mut base.debug, self.debug);
        set(&mut base.help, self.help);
        set(&mut base.version, self.version);
        set(&mut base.config_export, self.config_export);
        set(&mut base.output, self.output);
        set(&mut base.format, self.format);
        set(&mut base.stdout, self.stdout);
        set(&mut base.safe_out, self.safe_out);
        set(&mut base.append, self.append);
        set(&mut base.input, self.input);
        base
    }
}
