//! Mock system implementation for testing

use super::System;
use std::collections::{HashMap, HashSet};
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Reported size of a directory entry, mirroring what `stat` gives on most filesystems
const DIR_LEN: u64 = 4096;

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem, environment and stdin,
/// perfect for fast, isolated unit tests without side effects.
///
/// # Example
/// ```
/// use har2oapi::system::{mock::MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_home("/home/user").unwrap()
///     .with_file("/test/file.har", b"{}").unwrap()
///     .with_stdin("{\"log\":{\"entries\":[]}}").unwrap();
///
/// assert_eq!(system.home_dir().unwrap(), Path::new("/home/user"));
/// assert_eq!(system.file_len(Path::new("/test/file.har")).unwrap(), 2);
/// assert!(!system.stdin_is_terminal());
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: PathBuf,
    home_dir: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
    /// `None` means stdin is an interactive terminal
    stdin: Option<Vec<u8>>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    ///
    /// The default state has no home directory, no install directory, a
    /// working directory of `/` and an interactive (terminal) stdin.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: PathBuf::from("/"),
                home_dir: None,
                exe_dir: None,
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                unreadable: HashSet::new(),
                stdin: None,
            })),
        }
    }

    fn update<F>(self, apply: F) -> io::Result<Self>
    where
        F: FnOnce(&mut MockSystemState),
    {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        apply(&mut *state);
        drop(state);
        Ok(self)
    }

    /// Set an environment variable (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> io::Result<Self> {
        self.update(|state| {
            state.env_vars.insert(key.to_owned(), value.to_owned());
        })
    }

    /// Set the current working directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        self.update(|state| {
            ensure_parent_dirs(&mut state.dirs, &dir);
            state.current_dir = dir;
        })
    }

    /// Set the home directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_home<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        self.update(|state| {
            ensure_parent_dirs(&mut state.dirs, &dir);
            state.home_dir = Some(dir);
        })
    }

    /// Set the directory the executable lives in (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_exe_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        self.update(|state| {
            ensure_parent_dirs(&mut state.dirs, &dir);
            state.exe_dir = Some(dir);
        })
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        self.update(|state| {
            if let Some(parent) = path.parent() {
                ensure_parent_dirs(&mut state.dirs, parent);
            }
            state.files.insert(path, contents.to_vec());
        })
    }

    /// Add a directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        self.update(|state| ensure_parent_dirs(&mut state.dirs, &path))
    }

    /// Add a file that exists but cannot be read, e.g. permission denied (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_unreadable_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        self.with_file(&path, contents)?
            .update(|state| {
                state.unreadable.insert(path);
            })
    }

    /// Pipe content into standard input (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the mock state lock is poisoned
    #[inline]
    pub fn with_stdin(self, contents: &str) -> io::Result<Self> {
        let bytes = contents.as_bytes().to_vec();
        self.update(|state| state.stdin = Some(bytes))
    }

    /// Contents of a file in the in-memory filesystem, if present
    #[must_use]
    #[inline]
    pub fn file_contents<P: AsRef<Path>>(&self, path: P) -> Option<Vec<u8>> {
        let state = self.state.read().ok()?;
        state.files.get(path.as_ref()).cloned()
    }
}

fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        dirs.insert(ancestor.to_path_buf());
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    #[expect(clippy::map_err_ignore, reason = "This is for VarError")]
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        let state = self.state.read().map_err(|_| VarError::NotPresent)?;
        state.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(state.current_dir.clone())
    }

    #[inline]
    fn home_dir(&self) -> Option<PathBuf> {
        let state = self.state.read().ok()?;
        state.home_dir.clone()
    }

    #[inline]
    fn exe_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.exe_dir.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Executable directory unknown")
        })
    }

    #[inline]
    #[expect(clippy::as_conversions, reason = "This is for usize to u64 conversion")]
    fn file_len(&self, path: &Path) -> io::Result<u64> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        if let Some(bytes) = state.files.get(path) {
            return Ok(bytes.len() as u64);
        }
        if state.dirs.contains(path) {
            return Ok(DIR_LEN);
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Path not found: {}", path.display()),
        ))
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        if state.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", path.display()),
            ));
        }
        if state.dirs.contains(path) {
            return Err(io::Error::other(format!(
                "Is a directory: {}",
                path.display()
            )));
        }
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn stdin_is_terminal(&self) -> bool {
        self.state
            .read()
            .map(|state| state.stdin.is_none())
            .unwrap_or(true)
    }

    #[inline]
    fn read_stdin(&self) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.stdin.clone().unwrap_or_default();
        drop(state);
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }
}
