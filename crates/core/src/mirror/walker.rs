//! Directory walker mirroring an input tree into an output directory.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use super::config::MirrorConfig;
use super::copy::copy_file;
use super::error::MirrorError;
use super::types::{FileAction, MirrorReport};
use crate::encoder::{transcode, EncodeJob, Encoder};
use crate::playlist::Playlist;
use crate::request::{classify, ConversionRequest, FileClass};

/// Walks an input directory and recreates it under an output directory.
pub struct MirrorWalker<'a, E: Encoder + ?Sized> {
    encoder: &'a E,
    config: &'a MirrorConfig,
}

impl<'a, E: Encoder + ?Sized> MirrorWalker<'a, E> {
    pub fn new(encoder: &'a E, config: &'a MirrorConfig) -> Self {
        Self { encoder, config }
    }

    /// Mirrors `request.input_directory` into `output_root`.
    ///
    /// Every converted audio file is pushed onto `playlist`. Only an
    /// unusable input directory is an error; per-file failures are logged
    /// and tallied in the report.
    pub async fn mirror(
        &self,
        request: &ConversionRequest,
        output_root: &Path,
        playlist: &mut Playlist,
    ) -> Result<MirrorReport, MirrorError> {
        let input_root = request.input_directory.as_path();
        if !tokio::fs::metadata(input_root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            return Err(MirrorError::InputNotDirectory {
                path: input_root.to_path_buf(),
            });
        }

        let files = collect_files(input_root, output_root).await?;
        debug!(
            "Found {} files under {}",
            files.len(),
            input_root.display()
        );

        let mut report = MirrorReport::default();
        for source in files {
            // collect_files only yields paths below the input root
            let Ok(relative) = source.strip_prefix(input_root) else {
                continue;
            };
            let relative = relative.to_path_buf();

            match self
                .mirror_file(request, &source, &relative, output_root, playlist)
                .await
            {
                Ok(action) => report.record(action),
                Err(e) => {
                    error!("Failed to process {}: {}", source.display(), e);
                    report.record_failure(source);
                }
            }
        }

        Ok(report)
    }

    async fn mirror_file(
        &self,
        request: &ConversionRequest,
        source: &Path,
        relative: &Path,
        output_root: &Path,
        playlist: &mut Playlist,
    ) -> Result<FileAction, MirrorError> {
        let class = classify(source);
        if class == FileClass::Other {
            debug!("Skipping {}", source.display());
            return Ok(FileAction::Skipped);
        }

        match class {
            FileClass::Audio => {
                let mut destination_relative = relative.to_path_buf();
                if let Some(extension) = request.target_format.output_extension() {
                    destination_relative.set_extension(extension);
                }
                let destination = output_root.join(&destination_relative);
                ensure_parent_dir(&destination).await?;

                info!(
                    "Converting {} to {} ({}) ...",
                    source.display(),
                    destination.display(),
                    request.target_format
                );
                let job = EncodeJob::new(source, &destination, request.target_format);
                let result = transcode(self.encoder, &job).await?;
                debug!(
                    "Converted {} in {} ms, {} bytes, {} tags",
                    destination.display(),
                    result.duration_ms,
                    result.output_size_bytes,
                    result.tags_written
                );
                playlist.push(&destination_relative);
                Ok(FileAction::Converted)
            }
            FileClass::Image => {
                // Images keep their name and extension
                let destination = output_root.join(relative);
                ensure_parent_dir(&destination).await?;

                info!(
                    "Copying {} to {} ...",
                    source.display(),
                    destination.display()
                );
                copy_file(source, &destination, self.config).await?;
                Ok(FileAction::Copied)
            }
            FileClass::Other => Ok(FileAction::Skipped),
        }
    }
}

/// Lists the files below `input_root` in file name order.
///
/// `output_root` is pruned when it lies inside the input tree. Unreadable
/// entries are logged and left out.
async fn collect_files(input_root: &Path, output_root: &Path) -> Result<Vec<PathBuf>, MirrorError> {
    let input_root = input_root.to_path_buf();
    let output_root = output_root.to_path_buf();

    tokio::task::spawn_blocking(move || {
        WalkDir::new(&input_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != output_root)
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect()
    })
    .await
    .map_err(|e| MirrorError::Io(std::io::Error::other(e)))
}

/// Creates the parent directory of `path` unless it already exists.
async fn ensure_parent_dir(path: &Path) -> Result<(), MirrorError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if tokio::fs::metadata(parent).await.is_ok() {
        return Ok(());
    }

    info!("Creating directory {} ...", parent.display());
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| MirrorError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::TargetFormat;
    use crate::testing::{fixtures, MockEncoder};
    use tempfile::TempDir;

    fn write_flac(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, fixtures::flac_bytes(&[("TITLE", "Song")])).unwrap();
    }

    #[tokio::test]
    async fn test_mirror_classifies_files() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Album FLAC");
        let output = dir.path().join("Album 320");
        write_flac(&input.join("track.FLAC"));
        std::fs::write(input.join("Cover.JPG"), b"\xFF\xD8jpeg").unwrap();
        std::fs::write(input.join("notes.txt"), b"notes").unwrap();

        let encoder = MockEncoder::new();
        let config = MirrorConfig::default();
        let walker = MirrorWalker::new(&encoder, &config);
        let request = ConversionRequest::new(&input, TargetFormat::Cbr320);
        let mut playlist = Playlist::new(&output);

        let report = walker.mirror(&request, &output, &mut playlist).await.unwrap();

        assert_eq!(report.converted, 1);
        assert_eq!(report.copied, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 0);
        assert!(output.join("track.mp3").exists());
        assert_eq!(std::fs::read(output.join("Cover.JPG")).unwrap(), b"\xFF\xD8jpeg");
        assert!(!output.join("notes.txt").exists());
        assert_eq!(playlist.sorted_entries(), ["track.mp3"]);
    }

    #[tokio::test]
    async fn test_images_keep_their_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Album FLAC");
        let output = dir.path().join("Album V0");
        write_flac(&input.join("01.flac"));
        std::fs::write(input.join("cover.jpg"), b"\xFF\xD8jpeg").unwrap();
        std::fs::write(input.join("folder.png"), b"png").unwrap();

        let encoder = MockEncoder::new();
        let config = MirrorConfig::default();
        let walker = MirrorWalker::new(&encoder, &config);
        let request = ConversionRequest::new(&input, TargetFormat::Vbr0);
        let mut playlist = Playlist::new(&output);

        let report = walker.mirror(&request, &output, &mut playlist).await.unwrap();

        assert_eq!(report.copied, 2);
        assert_eq!(std::fs::read(output.join("cover.jpg")).unwrap(), b"\xFF\xD8jpeg");
        assert_eq!(std::fs::read(output.join("folder.png")).unwrap(), b"png");
        assert!(!output.join("cover.mp3").exists());
        assert!(!output.join("folder.mp3").exists());
        assert_eq!(playlist.sorted_entries(), ["01.mp3"]);
    }

    #[tokio::test]
    async fn test_mirror_recreates_subdirectories() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Box Set");
        let output = dir.path().join("Box Set [V0 (VBR)]");
        write_flac(&input.join("CD2").join("01.flac"));
        write_flac(&input.join("CD1").join("01.flac"));
        std::fs::create_dir_all(input.join("Scans")).unwrap();
        std::fs::write(input.join("Scans").join("back.png"), b"png").unwrap();

        let encoder = MockEncoder::new();
        let config = MirrorConfig::default();
        let walker = MirrorWalker::new(&encoder, &config);
        let request = ConversionRequest::new(&input, TargetFormat::Vbr0);
        let mut playlist = Playlist::new(&output);

        let report = walker.mirror(&request, &output, &mut playlist).await.unwrap();

        assert_eq!(report.converted, 2);
        assert_eq!(report.copied, 1);
        assert!(output.join("Scans").join("back.png").exists());
        assert_eq!(playlist.sorted_entries(), ["CD1/01.mp3", "CD2/01.mp3"]);

        // Discovery order is by file name
        let encoded: Vec<PathBuf> = encoder
            .recorded_encodes()
            .await
            .into_iter()
            .map(|e| e.job.input_path)
            .collect();
        assert_eq!(
            encoded,
            [input.join("CD1").join("01.flac"), input.join("CD2").join("01.flac")]
        );
    }

    #[tokio::test]
    async fn test_resample_keeps_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Album [FLAC]");
        let output = dir.path().join("Album [FLAC 16-44.1]");
        write_flac(&input.join("01.flac"));

        let encoder = MockEncoder::new();
        let config = MirrorConfig::default();
        let walker = MirrorWalker::new(&encoder, &config);
        let request = ConversionRequest::new(
            &input,
            TargetFormat::FlacResample {
                sample_rate: 44_100,
            },
        );
        let mut playlist = Playlist::new(&output);

        walker.mirror(&request, &output, &mut playlist).await.unwrap();

        assert!(output.join("01.flac").exists());
        assert_eq!(playlist.sorted_entries(), ["01.flac"]);
    }

    #[tokio::test]
    async fn test_failed_file_does_not_stop_walk() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Album");
        let output = dir.path().join("Album [320]");
        write_flac(&input.join("01.flac"));
        write_flac(&input.join("02.flac"));
        write_flac(&input.join("03.flac"));

        let encoder = MockEncoder::new();
        encoder.fail_for("02.flac").await;
        let config = MirrorConfig::default();
        let walker = MirrorWalker::new(&encoder, &config);
        let request = ConversionRequest::new(&input, TargetFormat::Cbr320);
        let mut playlist = Playlist::new(&output);

        let report = walker.mirror(&request, &output, &mut playlist).await.unwrap();

        assert_eq!(report.converted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failed_files, vec![input.join("02.flac")]);
        assert!(!output.join("02.mp3").exists());
        assert_eq!(playlist.sorted_entries(), ["01.mp3", "03.mp3"]);
    }

    #[tokio::test]
    async fn test_nested_output_is_not_walked() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Album");
        let output = input.join("Album [320]");
        write_flac(&input.join("01.flac"));
        write_flac(&output.join("stale.flac"));

        let encoder = MockEncoder::new();
        let config = MirrorConfig::default();
        let walker = MirrorWalker::new(&encoder, &config);
        let request = ConversionRequest::new(&input, TargetFormat::Cbr320);
        let mut playlist = Playlist::new(&output);

        let report = walker.mirror(&request, &output, &mut playlist).await.unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(encoder.encode_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let encoder = MockEncoder::new();
        let config = MirrorConfig::default();
        let walker = MirrorWalker::new(&encoder, &config);
        let request = ConversionRequest::new(dir.path().join("missing"), TargetFormat::Vbr0);
        let mut playlist = Playlist::new(dir.path().join("out"));

        let result = walker
            .mirror(&request, &dir.path().join("out"), &mut playlist)
            .await;
        assert!(matches!(result, Err(MirrorError::InputNotDirectory { .. })));
        assert_eq!(encoder.encode_count().await, 0);
    }
}
