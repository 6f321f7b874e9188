//! Command-line interface module
//!
//! Handles the parameter schema and argument parsing

pub mod args;
pub mod schema;

pub use args::{ParseOutcome, ShortKeyedValues, parse};
pub use schema::{OptionSpec, PARAM_DEFS, ParamDef, build_option_schema};
