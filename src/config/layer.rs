//! Precedence merge: defaults, then config layers, then command-line overrides
//!
//! Layers are read one after the other in [`ConfigLayer::ORDER`]; each layer
//! replaces whole values per key (no nested merging), so later layers win.

use crate::cli::args::ShortKeyedValues;
use crate::cli::schema::{ParamDef, rename};
use crate::config::loader::{load_optional, parse_layer};
use crate::config::paths::{ConfigLayer, SysPaths};
use crate::config::{PartialParams, RunParams};
use crate::system::System;
use anyhow::Result;
use tracing::debug;

/// Load every config layer that exists, lowest precedence first
///
/// Missing or empty files are skipped. The first unreadable or malformed
/// layer aborts the whole run.
///
/// # Errors
///
/// Returns an error if a layer exists but cannot be read, parsed or validated
#[inline]
pub fn load_layers(system: &dyn System, paths: &SysPaths) -> Result<Vec<PartialParams>> {
    let mut layers = Vec::with_capacity(ConfigLayer::ORDER.len());

    for (layer, path) in paths.ordered() {
        let Some(text) = load_optional(system, path)? else {
            debug!("No {} config at {}", layer.name(), path.display());
            continue;
        };

        let parsed = parse_layer(&text, path)?;
        debug!(
            "Loaded {} config from {}: {}",
            layer.name(),
            path.display(),
            serde_json::to_string(&parsed).unwrap_or_default()
        );
        layers.push(parsed);
    }

    Ok(layers)
}

/// Fold config layers over the defaults, later layers winning
#[must_use]
#[inline]
pub fn layer(defaults: RunParams, layers: Vec<PartialParams>) -> RunParams {
    layers
        .into_iter()
        .fold(defaults, |merged, layer| layer.apply_to(merged))
}

/// Compute `defaults ⊕ file layers ⊕ command line`
///
/// Command-line values are keyed by parser key and renamed to canonical
/// names through `defs` first; keys `defs` does not know are dropped. They
/// always win over every file layer.
///
/// # Errors
///
/// Returns an error if a command-line value has the wrong type for its parameter
#[inline]
pub fn resolve(
    defs: &[ParamDef],
    defaults: RunParams,
    file_layers: Vec<PartialParams>,
    cli: &ShortKeyedValues,
) -> Result<RunParams> {
    let overrides = PartialParams::from_map(rename(defs, cli))?;
    Ok(overrides.apply_to(layer(defaults, file_layers)))
}
