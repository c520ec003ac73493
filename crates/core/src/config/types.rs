use serde::{Deserialize, Serialize};

use crate::encoder::EncoderConfig;
use crate::mirror::MirrorConfig;
use crate::packager::PackagerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub packager: PackagerConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
}

impl Config {
    /// Overrides the announce URL, e.g. from a command line flag.
    pub fn with_announce_url(mut self, announce_url: impl Into<String>) -> Self {
        self.packager.announce_url = Some(announce_url.into());
        self
    }

    /// Disables torrent packaging.
    pub fn without_packaging(mut self) -> Self {
        self.packager.enabled = false;
        self
    }
}

/// Sanitized config for logging (announce URL redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub encoder: EncoderConfig,
    pub packager: SanitizedPackagerConfig,
    pub mirror: MirrorConfig,
}

/// Packager config with the announce URL hidden.
///
/// Private trackers embed a passkey in the announce URL.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPackagerConfig {
    pub enabled: bool,
    pub ctorrent_path: String,
    pub announce_url_configured: bool,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            encoder: config.encoder.clone(),
            packager: SanitizedPackagerConfig {
                enabled: config.packager.enabled,
                ctorrent_path: config.packager.ctorrent_path.display().to_string(),
                announce_url_configured: config
                    .packager
                    .announce_url
                    .as_deref()
                    .is_some_and(|url| !url.is_empty()),
                timeout_secs: config.packager.timeout_secs,
            },
            mirror: config.mirror.clone(),
        }
    }
}
