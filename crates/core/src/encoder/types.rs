//! Types for the encoder module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::request::TargetFormat;

/// One external process of an encoding pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    /// `flac -d` producing PCM.
    Decode,
    /// `lame` consuming PCM.
    Encode,
    /// `sox` resampling FLAC to FLAC.
    Resample,
}

impl fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Decode => "decode",
            Self::Encode => "encode",
            Self::Resample => "resample",
        };
        f.write_str(name)
    }
}

/// A single file to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeJob {
    /// Source FLAC file.
    pub input_path: PathBuf,
    /// Destination file; its parent directory must exist.
    pub output_path: PathBuf,
    /// Target encoding.
    pub target: TargetFormat,
}

impl EncodeJob {
    /// Creates a new job.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        target: TargetFormat,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            target,
        }
    }
}

/// Result of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeResult {
    /// Path of the produced file.
    pub output_path: PathBuf,
    /// Size of the produced file.
    pub output_size_bytes: u64,
    /// Wall clock time spent.
    pub duration_ms: u64,
    /// Number of tag keys written after encoding.
    pub tags_written: usize,
}
