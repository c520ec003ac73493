//! Configuration for the packager module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for torrent packaging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagerConfig {
    /// Whether finished directories are packaged at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Path to the ctorrent binary.
    #[serde(default = "default_ctorrent_path")]
    pub ctorrent_path: PathBuf,

    /// Tracker announce URL embedded in the descriptor.
    #[serde(default)]
    pub announce_url: Option<String>,

    /// Timeout for packaging one directory in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_ctorrent_path() -> PathBuf {
    PathBuf::from("ctorrent")
}

fn default_timeout() -> u64 {
    600
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ctorrent_path: default_ctorrent_path(),
            announce_url: None,
            timeout_secs: default_timeout(),
        }
    }
}
