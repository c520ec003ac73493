//! Encoding followed by tag transfer.

use std::path::Path;
use tracing::{debug, warn};

use super::error::EncoderError;
use super::traits::Encoder;
use super::types::{EncodeJob, EncodeResult};
use crate::tags::{transfer_tags, TagFormat};

/// Encodes a file and then copies the source tags onto the output.
///
/// Tags are only written once the encoder has finished. If either step
/// fails the partially written output is removed, so a failed conversion
/// never leaves a truncated or untagged file behind.
pub async fn transcode<E: Encoder + ?Sized>(
    encoder: &E,
    job: &EncodeJob,
) -> Result<EncodeResult, EncoderError> {
    let result = match encoder.encode(job).await {
        Ok(result) => result,
        Err(e) => {
            discard_output(&job.output_path).await;
            return Err(e);
        }
    };

    let source = job.input_path.clone();
    let destination = job.output_path.clone();
    let format = TagFormat::for_target(&job.target);

    let tagged = tokio::task::spawn_blocking(move || transfer_tags(&source, &destination, format))
        .await
        .map_err(|e| EncoderError::Io(std::io::Error::other(e)))
        .and_then(|tagged| tagged.map_err(EncoderError::from));

    match tagged {
        Ok(tags_written) => Ok(EncodeResult {
            tags_written,
            ..result
        }),
        Err(e) => {
            discard_output(&job.output_path).await;
            Err(e)
        }
    }
}

async fn discard_output(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed incomplete output {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(
            "Failed to remove incomplete output {}: {}",
            path.display(),
            e
        ),
    }
}
