//! Per-directory M3U playlist.
//!
//! The walker registers every audio file it produced; once the walk is done
//! the entries are sorted and written to `<directory name>.m3u` inside the
//! output directory, replacing any previous playlist.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while writing a playlist.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// The output directory has no name to derive the playlist name from.
    #[error("Cannot derive a playlist name from {path}")]
    UnnamedDirectory { path: PathBuf },

    /// Failed to write the playlist file.
    #[error("Failed to write playlist {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates the audio files produced for one output directory.
#[derive(Debug, Clone)]
pub struct Playlist {
    directory: PathBuf,
    entries: Vec<String>,
}

impl Playlist {
    /// Creates an empty playlist for an output directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            entries: Vec::new(),
        }
    }

    /// Registers a file by its path relative to the output directory.
    ///
    /// Components are joined with `/` whatever the platform separator is.
    pub fn push(&mut self, relative: &Path) {
        let entry = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        self.entries.push(entry);
    }

    /// The registered entries in lexicographic order.
    pub fn sorted_entries(&self) -> Vec<String> {
        let mut entries = self.entries.clone();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Path of the playlist file, `<dir>/<dir name>.m3u`.
    pub fn path(&self) -> Result<PathBuf, PlaylistError> {
        let name = self
            .directory
            .file_name()
            .ok_or_else(|| PlaylistError::UnnamedDirectory {
                path: self.directory.clone(),
            })?;
        let mut file_name = name.to_os_string();
        file_name.push(".m3u");
        Ok(self.directory.join(file_name))
    }

    /// Renders the playlist, one newline terminated entry per line.
    pub fn render(&self) -> String {
        self.sorted_entries()
            .into_iter()
            .map(|entry| entry + "\n")
            .collect()
    }

    /// Writes the playlist, replacing an existing one, and returns its path.
    pub async fn write(self) -> Result<PathBuf, PlaylistError> {
        let path = self.path()?;
        info!("Writing playlist {} ...", path.display());
        tokio::fs::write(&path, self.render())
            .await
            .map_err(|source| PlaylistError::WriteFailed {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
