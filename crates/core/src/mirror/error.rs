//! Error types for the mirror module.

use std::path::PathBuf;
use thiserror::Error;

use crate::encoder::EncoderError;

/// Errors that can occur while mirroring a directory.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The input path is missing or not a directory.
    #[error("Not a directory: {path}")]
    InputNotDirectory { path: PathBuf },

    /// Failed to create a destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a file.
    #[error("Failed to copy file from {source} to {destination}")]
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The copy does not match its source.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Converting an audio file failed.
    #[error(transparent)]
    Encode(#[from] EncoderError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MirrorError {
    /// Creates a copy failed error.
    pub fn copy_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::CopyFailed {
            source,
            destination,
            error,
        }
    }
}
