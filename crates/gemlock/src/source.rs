//! Loading lockfiles from disk.

use crate::error::LockfileError;
use crate::interpret::interpret_bytes;
use crate::tree::Node;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Standard lockfile name written by Bundler.
pub const DEFAULT_LOCKFILE_NAME: &str = "Gemfile.lock";

/// Where to read a lockfile from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfileLocation {
    path: PathBuf,
}

impl LockfileLocation {
    /// Uses the given path as-is.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves [`DEFAULT_LOCKFILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_LOCKFILE_NAME))
    }

    /// The path that will be read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for LockfileLocation {
    /// `Gemfile.lock` in the current working directory.
    ///
    /// Falls back to a relative path when the working directory is unknown.
    fn default() -> Self {
        match std::env::current_dir() {
            Ok(dir) => Self::in_dir(dir),
            Err(_) => Self::new(DEFAULT_LOCKFILE_NAME),
        }
    }
}

impl From<PathBuf> for LockfileLocation {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for LockfileLocation {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

/// Reads and interprets a lockfile, blocking the current thread.
///
/// # Errors
///
/// Returns [`LockfileError::Io`] carrying the underlying error unchanged if
/// the file cannot be read, or [`LockfileError::InvalidInput`] if it is not
/// UTF-8.
pub fn parse_sync(location: &LockfileLocation) -> Result<Node, LockfileError> {
    debug!(path = %location.path().display(), "reading lockfile");
    let bytes = std::fs::read(location.path())?;
    interpret_bytes(&bytes)
}

/// Reads and interprets a lockfile on the tokio runtime.
///
/// # Errors
///
/// Returns [`LockfileError::NotFound`] naming the path if the file cannot be
/// read, or [`LockfileError::InvalidInput`] if it is not UTF-8.
pub async fn parse(location: &LockfileLocation) -> Result<Node, LockfileError> {
    debug!(path = %location.path().display(), "reading lockfile");
    let bytes = tokio::fs::read(location.path()).await.map_err(|e| {
        debug!(path = %location.path().display(), error = %e, "lockfile read failed");
        LockfileError::NotFound {
            path: location.path().to_path_buf(),
        }
    })?;
    interpret_bytes(&bytes)
}
