//! System abstraction for environment, filesystem and standard input
//!
//! This module provides a unified trait for all external system interactions,
//! allowing for easy testing with mock implementations.

use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for system operations (environment + filesystem + stdin)
///
/// This trait abstracts all interactions with the operating system that the
/// configuration pipeline and the input/output adapters need.
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std` and `dirs`
/// - `MockSystem`: Test implementation using in-memory storage
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Get the user's home directory, if one can be determined
    fn home_dir(&self) -> Option<PathBuf>;

    /// Get the directory the running executable was installed into
    fn exe_dir(&self) -> io::Result<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Size in bytes of the entry at `path` (stat, not read)
    fn file_len(&self, path: &Path) -> io::Result<u64>;

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write bytes to a file, creating it if it doesn't exist and truncating it if it does
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    // ==================== Standard Input ====================

    /// Whether standard input is attached to an interactive terminal
    fn stdin_is_terminal(&self) -> bool;

    /// Read standard input until the stream ends
    fn read_stdin(&self) -> io::Result<String>;
}
