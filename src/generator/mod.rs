//! Generation engine seam
//!
//! The resolver hands the parsed HAR document and the generation subset of
//! the run parameters to a [`SpecGenerator`]. [`HarToOpenApi`] is the engine
//! shipped with the binary.

pub mod json_schema;
pub mod openapi;

pub use openapi::HarToOpenApi;

use crate::config::RunParams;
use crate::har::Har;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Generation behavior switches, taken from the resolved run parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub force_all_requests_in_same_spec: bool,
    pub add_servers_to_paths: bool,
    pub guess_authentication_headers: bool,
    pub relaxed_methods: bool,
    pub relaxed_content_type_json_parse: bool,
    pub filter_standard_headers: bool,
    pub log_errors: bool,
    pub attempt_to_parameterize_url: bool,
    pub drop_paths_without_successful_response: bool,
}

impl From<&RunParams> for GeneratorConfig {
    #[inline]
    fn from(params: &RunParams) -> Self {
        Self {
            force_all_requests_in_same_spec: params.force_all_requests_in_same_spec,
            add_servers_to_paths: params.add_servers_to_paths,
            guess_authentication_headers: params.guess_authentication_headers,
            relaxed_methods: params.relaxed_methods,
            relaxed_content_type_json_parse: params.relaxed_content_type_json_parse,
            filter_standard_headers: params.filter_standard_headers,
            log_errors: params.log_errors,
            attempt_to_parameterize_url: params.attempt_to_parameterize_url,
            drop_paths_without_successful_response: params.drop_paths_without_successful_response,
        }
    }
}

/// Result of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSpec {
    /// The API description document
    pub spec: Value,
    /// Host the document describes, if any entry was used
    pub domain: Option<String>,
}

/// Turns a HAR document into an API description
pub trait SpecGenerator {
    /// Generate a document from every usable entry of `har`
    ///
    /// # Errors
    ///
    /// Returns a generation error if the document cannot be produced
    fn generate(&self, har: &Har, config: &GeneratorConfig) -> Result<GeneratedSpec>;
}
