//! Configuration for the mirror module.

use serde::{Deserialize, Serialize};

/// Configuration for mirroring input trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Whether copied images are verified against a SHA-256 checksum.
    #[serde(default)]
    pub verify_copies: bool,

    /// Buffer size for file copies in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    1024 * 1024 // 1 MB
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            verify_copies: false,
            buffer_size: default_buffer_size(),
        }
    }
}

impl MirrorConfig {
    /// Enables checksum verification of copies.
    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verify_copies = enabled;
        self
    }

    /// Sets the buffer size for copies.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MirrorConfig::default();
        assert!(!config.verify_copies);
        assert_eq!(config.buffer_size, 1024 * 1024);
    }

    #[test]
    fn test_config_builder() {
        let config = MirrorConfig::default()
            .with_verification(true)
            .with_buffer_size(4096);
        assert!(config.verify_copies);
        assert_eq!(config.buffer_size, 4096);
    }
}
