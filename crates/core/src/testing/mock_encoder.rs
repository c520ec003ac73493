//! Mock encoder for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::fixtures;
use crate::encoder::{EncodeJob, EncodeResult, Encoder, EncoderError, ProcessStage};

/// A recorded encode job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncode {
    /// The job that was submitted.
    pub job: EncodeJob,
    /// Whether the encode succeeded.
    pub success: bool,
}

/// Mock implementation of the Encoder trait.
///
/// Provides controllable behavior for testing:
/// - Track encode jobs for assertions
/// - Write valid MPEG or FLAC fixtures as output, so tag transfer works
/// - Simulate failures for the next job or for specific source files
#[derive(Debug, Clone, Default)]
pub struct MockEncoder {
    /// Recorded encodes.
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<EncoderError>>>,
    /// Source file names that always fail to encode.
    failing_files: Arc<RwLock<HashSet<String>>>,
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded encodes.
    pub async fn recorded_encodes(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }

    /// Get the number of encodes attempted.
    pub async fn encode_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: EncoderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every job whose source has this file name fail with an encode
    /// process failure.
    pub async fn fail_for(&self, file_name: impl Into<String>) {
        self.failing_files.write().await.insert(file_name.into());
    }

    async fn should_fail(&self, input_path: &Path) -> Option<EncoderError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Some(error);
        }

        let file_name = input_path.file_name()?.to_string_lossy().to_string();
        if self.failing_files.read().await.contains(&file_name) {
            return Some(EncoderError::process_failed(
                ProcessStage::Encode,
                Some(1),
                Some(format!("mock failure for {}", file_name)),
            ));
        }

        None
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, EncoderError> {
        if let Some(error) = self.should_fail(&job.input_path).await {
            // Mimic an encoder that died after writing part of its output
            let _ = tokio::fs::write(&job.output_path, b"partial").await;
            self.encodes.write().await.push(RecordedEncode {
                job: job.clone(),
                success: false,
            });
            return Err(error);
        }

        let output = if job.target.is_mp3() {
            fixtures::mp3_bytes()
        } else {
            fixtures::flac_bytes(&[])
        };
        tokio::fs::write(&job.output_path, &output).await?;

        self.encodes.write().await.push(RecordedEncode {
            job: job.clone(),
            success: true,
        });

        Ok(EncodeResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output.len() as u64,
            duration_ms: 0,
            tags_written: 0,
        })
    }
}
