//! Mock packager for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::packager::{descriptor_path, PackageResult, Packager, PackagerError};

/// Mock implementation of the Packager trait.
///
/// Writes a placeholder descriptor next to each packaged directory and
/// records the directories it was asked to package.
#[derive(Debug, Clone, Default)]
pub struct MockPackager {
    /// Directories packaged, in call order.
    packaged: Arc<RwLock<Vec<PathBuf>>>,
    /// If set, every call fails with a process failure.
    failing: Arc<RwLock<bool>>,
}

impl MockPackager {
    /// Create a new mock packager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the directories packaged so far.
    pub async fn packaged_directories(&self) -> Vec<PathBuf> {
        self.packaged.read().await.clone()
    }

    /// Make every following call fail.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }
}

#[async_trait]
impl Packager for MockPackager {
    fn name(&self) -> &str {
        "mock"
    }

    async fn package(&self, directory: &Path) -> Result<PackageResult, PackagerError> {
        self.packaged.write().await.push(directory.to_path_buf());

        if *self.failing.read().await {
            return Err(PackagerError::ProcessFailed {
                code: Some(1),
                stderr: Some("mock packaging failure".to_string()),
            });
        }

        let descriptor = descriptor_path(directory);
        let contents = b"d8:announce4:mocke";
        tokio::fs::write(&descriptor, contents).await?;

        Ok(PackageResult {
            descriptor_path: descriptor,
            size_bytes: contents.len() as u64,
            duration_ms: 0,
        })
    }
}
