//! Trait definitions for the packager module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::error::PackagerError;

/// Extension of archive descriptors.
const DESCRIPTOR_SUFFIX: &str = ".torrent";

/// Result of packaging a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageResult {
    /// Path of the written descriptor.
    pub descriptor_path: PathBuf,
    /// Size of the descriptor.
    pub size_bytes: u64,
    /// Wall clock time spent.
    pub duration_ms: u64,
}

/// A packager that builds an archive descriptor for a directory.
#[async_trait]
pub trait Packager: Send + Sync {
    /// Returns the name of this packager implementation.
    fn name(&self) -> &str;

    /// Packages the directory, writing the descriptor at
    /// [`descriptor_path`]`(directory)`.
    async fn package(&self, directory: &Path) -> Result<PackageResult, PackagerError>;
}

/// Path of the descriptor for a directory: the directory path with
/// `.torrent` appended, so it lands alongside the directory.
///
/// The suffix is appended rather than set as an extension because release
/// names commonly contain dots.
pub fn descriptor_path(directory: &Path) -> PathBuf {
    let mut path = OsString::from(directory.as_os_str());
    path.push(DESCRIPTOR_SUFFIX);
    PathBuf::from(path)
}
