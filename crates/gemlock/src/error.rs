//! Error types for lockfile interpretation and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when interpreting or loading a lockfile.
#[derive(Error, Debug)]
pub enum LockfileError {
    /// The input was not valid UTF-8 text.
    #[error("lockfile source must be UTF-8 text: {0}")]
    InvalidInput(#[from] std::str::Utf8Error),

    /// The lockfile could not be read by the async loader.
    #[error("couldn't find a Gemfile at the specified location: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The blocking loader failed to read the file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
