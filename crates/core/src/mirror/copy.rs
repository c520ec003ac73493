//! Streaming file copies with optional checksum verification.

use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::debug;

use super::config::MirrorConfig;
use super::error::MirrorError;

/// Copies `source` to `destination`, returning the number of bytes written.
///
/// An existing destination is overwritten. With `verify_copies` set, the
/// destination is read back and compared to the SHA-256 of the source; a
/// mismatching copy is removed.
pub async fn copy_file(
    source: &Path,
    destination: &Path,
    config: &MirrorConfig,
) -> Result<u64, MirrorError> {
    let copy_err =
        |e| MirrorError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e);

    let source_file = File::open(source).await.map_err(copy_err)?;
    let dest_file = File::create(destination).await.map_err(copy_err)?;

    let mut reader = BufReader::with_capacity(config.buffer_size, source_file);
    let mut writer = BufWriter::with_capacity(config.buffer_size, dest_file);

    let mut hasher = config.verify_copies.then(Sha256::new);
    let mut total_bytes = 0u64;
    let mut buffer = vec![0u8; config.buffer_size];

    loop {
        let bytes_read = reader.read(&mut buffer).await.map_err(copy_err)?;
        if bytes_read == 0 {
            break;
        }

        if let Some(ref mut h) = hasher {
            h.update(&buffer[..bytes_read]);
        }

        writer
            .write_all(&buffer[..bytes_read])
            .await
            .map_err(copy_err)?;
        total_bytes += bytes_read as u64;
    }

    writer.flush().await.map_err(copy_err)?;

    if let Some(hasher) = hasher {
        let expected = format!("{:x}", hasher.finalize());
        let actual = file_checksum(destination, config.buffer_size).await?;
        if expected != actual {
            let _ = tokio::fs::remove_file(destination).await;
            return Err(MirrorError::ChecksumMismatch {
                path: destination.to_path_buf(),
                expected,
                actual,
            });
        }
        debug!("Verified {} (sha256 {})", destination.display(), actual);
    }

    Ok(total_bytes)
}

/// Calculates the hex encoded SHA-256 of a file.
pub async fn file_checksum(path: &Path, buffer_size: usize) -> Result<String, MirrorError> {
    let file = File::open(path).await?;
    let mut reader = BufReader::with_capacity(buffer_size, file);
    let mut buffer = vec![0u8; buffer_size];
    let mut hasher = Sha256::new();

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
