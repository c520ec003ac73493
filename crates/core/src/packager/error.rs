//! Error types for the packager module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while packaging a directory.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The ctorrent binary does not exist.
    #[error("ctorrent not found at path: {path}")]
    ToolNotFound { path: PathBuf },

    /// No announce URL configured.
    #[error("No announce URL configured")]
    MissingAnnounceUrl,

    /// The directory to package does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// ctorrent exited unsuccessfully.
    #[error("ctorrent failed with exit code {code:?}")]
    ProcessFailed {
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// Packaging timed out; the process was killed.
    #[error("Packaging timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// ctorrent succeeded but wrote no descriptor.
    #[error("Descriptor not created: {path}")]
    DescriptorMissing { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
