//! Packager implementation driving ctorrent.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

use super::config::PackagerConfig;
use super::error::PackagerError;
use super::traits::{descriptor_path, PackageResult, Packager};
use crate::process::{command_line, Captured};

/// Packager creating private, single-tracker torrents with ctorrent.
pub struct CtorrentPackager {
    config: PackagerConfig,
    announce_url: String,
}

impl CtorrentPackager {
    /// Creates a packager from configuration.
    ///
    /// Fails when no announce URL is configured.
    pub fn new(config: PackagerConfig) -> Result<Self, PackagerError> {
        let announce_url = config
            .announce_url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or(PackagerError::MissingAnnounceUrl)?;
        Ok(Self {
            config,
            announce_url,
        })
    }

    /// Builds ctorrent arguments for a directory.
    fn build_args(&self, directory: &Path, descriptor: &Path) -> Vec<String> {
        vec![
            "-t".to_string(),
            "-p".to_string(),
            "-u".to_string(),
            self.announce_url.clone(),
            "-s".to_string(),
            descriptor.to_string_lossy().to_string(),
            directory.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl Packager for CtorrentPackager {
    fn name(&self) -> &str {
        "ctorrent"
    }

    async fn package(&self, directory: &Path) -> Result<PackageResult, PackagerError> {
        let start = Instant::now();

        if !tokio::fs::metadata(directory)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            return Err(PackagerError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let descriptor = descriptor_path(directory);

        // ctorrent will not overwrite an existing descriptor
        match tokio::fs::remove_file(&descriptor).await {
            Ok(()) => debug!("Removed previous descriptor {}", descriptor.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(PackagerError::Io(e)),
        }

        let args = self.build_args(directory, &descriptor);
        info!(
            "Creating torrent file {} ...",
            descriptor.display()
        );
        // The announce URL is a secret, keep it out of info level logs
        debug!("{}", command_line(&self.config.ctorrent_path, &args));

        let child = Command::new(&self.config.ctorrent_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PackagerError::ToolNotFound {
                        path: self.config.ctorrent_path.clone(),
                    }
                } else {
                    PackagerError::Io(e)
                }
            })?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(output) => Captured::from(output?),
            Err(_) => {
                return Err(PackagerError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                })
            }
        };

        if !output.stdout.trim().is_empty() {
            debug!("ctorrent stdout: {}", output.stdout.trim_end());
        }
        if let Some(stderr) = output.stderr_text() {
            error!("ctorrent stderr: {}", stderr);
        }

        if !output.status.success() {
            return Err(PackagerError::ProcessFailed {
                code: output.status.code(),
                stderr: output.stderr_text(),
            });
        }

        let meta = tokio::fs::metadata(&descriptor)
            .await
            .map_err(|_| PackagerError::DescriptorMissing {
                path: descriptor.clone(),
            })?;

        Ok(PackageResult {
            descriptor_path: descriptor,
            size_bytes: meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
