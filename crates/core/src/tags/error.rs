//! Error types for the tags module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing tags.
#[derive(Debug, Error)]
pub enum TagError {
    /// The file is not a valid instance of its expected container.
    #[error("Failed to read tags from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// The tag block could not be persisted.
    #[error("Failed to write tags to {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// I/O error while opening the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TagError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
