//! Trait definitions for the encoder module.

use async_trait::async_trait;

use super::error::EncoderError;
use super::types::{EncodeJob, EncodeResult};

/// An encoder that turns one FLAC file into the job's target format.
///
/// Implementations only produce the audio stream; tags are transferred
/// afterwards by [`super::transcode`].
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Encodes a file, returning once every spawned process has exited.
    ///
    /// `tags_written` of the result is always 0.
    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, EncoderError>;
}
