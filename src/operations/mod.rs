//! Operations module
//!
//! Input acquisition and output delivery around the generation call

pub mod input;
pub mod output;

pub use input::{InputSource, acquire};
pub use output::{OutputFormat, write_output};
