//! Encoder module for converting FLAC sources into distribution formats.
//!
//! This module provides the `Encoder` trait and an implementation driving the
//! external `flac`, `lame` and `sox` tools.
//!
//! # Pipelines
//!
//! - MP3 (V0 and 320): `flac -c -d` decodes to stdout, piped straight into
//!   the stdin of `lame`. Both processes run concurrently and are awaited
//!   together.
//! - FLAC resample: a single `sox` run producing 16 bit output at the
//!   requested rate with shaped dither.
//!
//! [`transcode`] runs an encoder and then transfers the source tags onto the
//! finished output.
//!
//! # Example
//!
//! ```ignore
//! use flacport_core::encoder::{transcode, EncodeJob, EncoderConfig, ExternalEncoder};
//! use flacport_core::request::TargetFormat;
//!
//! let encoder = ExternalEncoder::new(EncoderConfig::default());
//! let job = EncodeJob::new("/music/a.flac", "/music/out/a.mp3", TargetFormat::Vbr0);
//! let result = transcode(&encoder, &job).await?;
//! println!("Encoded {} bytes in {} ms", result.output_size_bytes, result.duration_ms);
//! ```

mod config;
mod error;
mod external;
mod traits;
mod transcode;
mod types;

pub use config::EncoderConfig;
pub use error::EncoderError;
pub use external::ExternalEncoder;
pub use traits::Encoder;
pub use transcode::transcode;
pub use types::{EncodeJob, EncodeResult, ProcessStage};
