//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::ProcessStage;
use crate::tags::TagError;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// An external tool could not be started because it does not exist.
    #[error("{stage} tool not found at path: {path}")]
    ToolNotFound { stage: ProcessStage, path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The job cannot be run as described.
    #[error("Invalid encode job: {reason}")]
    InvalidJob { reason: String },

    /// An external process exited unsuccessfully.
    #[error("{stage} process failed with exit code {code:?}")]
    ProcessFailed {
        stage: ProcessStage,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// Encoding timed out; the processes were killed.
    #[error("Encoding timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The processes succeeded but left no output file.
    #[error("Output file not created: {path}")]
    OutputMissing { path: PathBuf },

    /// Tag transfer onto the output failed.
    #[error("Tag transfer failed: {0}")]
    Tag(#[from] TagError),

    /// I/O error during encoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncoderError {
    /// Creates a process failed error.
    pub fn process_failed(stage: ProcessStage, code: Option<i32>, stderr: Option<String>) -> Self {
        Self::ProcessFailed {
            stage,
            code,
            stderr,
        }
    }

    /// Creates an invalid job error.
    pub fn invalid_job(reason: impl Into<String>) -> Self {
        Self::InvalidJob {
            reason: reason.into(),
        }
    }

    /// Captured diagnostic output of the failing process, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ProcessFailed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}
