//! Mirror module for recreating an input tree in an output directory.
//!
//! The walker visits every file below an input directory in file name order
//! and handles it by class:
//!
//! - FLAC files are transcoded to the target format and registered with the
//!   directory's playlist
//! - Artwork is copied byte for byte, optionally verified with SHA-256
//! - Everything else is skipped
//!
//! Destination directories are created on demand. A failing file is logged
//! and counted, the walk goes on with its siblings.
//!
//! # Example
//!
//! ```ignore
//! use flacport_core::mirror::{MirrorConfig, MirrorWalker};
//! use flacport_core::playlist::Playlist;
//!
//! let walker = MirrorWalker::new(&encoder, &MirrorConfig::default());
//! let mut playlist = Playlist::new(&output_dir);
//! let report = walker.mirror(&request, &output_dir, &mut playlist).await?;
//! println!("{} converted, {} failed", report.converted, report.failed);
//! ```

mod config;
mod copy;
mod error;
mod types;
mod walker;

pub use config::MirrorConfig;
pub use copy::{copy_file, file_checksum};
pub use error::MirrorError;
pub use types::{FileAction, MirrorReport};
pub use walker::MirrorWalker;
