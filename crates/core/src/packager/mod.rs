//! Packager module for turning a finished output directory into a torrent.
//!
//! The descriptor is written next to the directory, named after it with a
//! `.torrent` suffix. Packaging is best effort: callers log failures and go
//! on with the run.

mod config;
mod ctorrent;
mod error;
mod traits;

pub use config::PackagerConfig;
pub use ctorrent::CtorrentPackager;
pub use error::PackagerError;
pub use traits::{descriptor_path, PackageResult, Packager};
