//! Configuration for the encoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the external tool encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Path to the flac binary.
    #[serde(default = "default_flac_path")]
    pub flac_path: PathBuf,

    /// Path to the lame binary.
    #[serde(default = "default_lame_path")]
    pub lame_path: PathBuf,

    /// Path to the sox binary.
    #[serde(default = "default_sox_path")]
    pub sox_path: PathBuf,

    /// Timeout for converting a single file in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Additional lame arguments, inserted before the input/output operands.
    #[serde(default)]
    pub extra_lame_args: Vec<String>,
}

fn default_flac_path() -> PathBuf {
    PathBuf::from("flac")
}

fn default_lame_path() -> PathBuf {
    PathBuf::from("lame")
}

fn default_sox_path() -> PathBuf {
    PathBuf::from("sox")
}

fn default_timeout() -> u64 {
    3600 // 1 hour
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            flac_path: default_flac_path(),
            lame_path: default_lame_path(),
            sox_path: default_sox_path(),
            timeout_secs: default_timeout(),
            extra_lame_args: Vec::new(),
        }
    }
}

impl EncoderConfig {
    /// Creates a new config with custom tool paths.
    pub fn with_paths(flac_path: PathBuf, lame_path: PathBuf, sox_path: PathBuf) -> Self {
        Self {
            flac_path,
            lame_path,
            sox_path,
            ..Default::default()
        }
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncoderConfig::default();
        assert_eq!(config.flac_path, PathBuf::from("flac"));
        assert_eq!(config.lame_path, PathBuf::from("lame"));
        assert_eq!(config.sox_path, PathBuf::from("sox"));
        assert_eq!(config.timeout_secs, 3600);
        assert!(config.extra_lame_args.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = EncoderConfig::with_paths(
            PathBuf::from("/usr/local/bin/flac"),
            PathBuf::from("/usr/local/bin/lame"),
            PathBuf::from("/usr/local/bin/sox"),
        )
        .with_timeout(60);

        assert_eq!(config.lame_path, PathBuf::from("/usr/local/bin/lame"));
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_config_serialization() {
        let config = EncoderConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EncoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.timeout_secs, config.timeout_secs);
        assert_eq!(parsed.sox_path, config.sox_path);
    }
}
