//! Tag transfer between source FLAC files and converted outputs.
//!
//! Tags are read from the FLAC Vorbis comment block into a [`TagSet`] with
//! lowercase keys. MP3 outputs receive the allow-listed subset as ID3v2
//! frames; resampled FLAC outputs receive every comment unfiltered.

mod error;
mod io;
mod types;

pub use error::TagError;
pub use io::{read_tags, read_tags_as, transfer_tags, write_tags};
pub use types::{TagFormat, TagSet, MP3_ALLOWED_KEYS};
