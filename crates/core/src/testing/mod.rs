//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the encoder and packager
//! traits, plus fixtures producing minimal but valid FLAC and MPEG files, so
//! whole runs can be exercised without the external tools installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use flacport_core::testing::{fixtures, MockEncoder, MockPackager};
//!
//! let encoder = MockEncoder::new();
//! let packager = MockPackager::new();
//!
//! std::fs::write(dir.join("01.flac"), fixtures::flac_bytes(&[("TITLE", "Song")]))?;
//! encoder.fail_for("02.flac").await;
//! ```

mod mock_encoder;
mod mock_packager;

pub use mock_encoder::{MockEncoder, RecordedEncode};
pub use mock_packager::MockPackager;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Length of one 128 kbit/s, 44.1 kHz MPEG-1 Layer III frame.
    const MPEG_FRAME_LEN: usize = 417;

    /// Number of frames in [`mp3_bytes`].
    const MPEG_FRAME_COUNT: usize = 8;

    const FLAC_PADDING_LEN: usize = 64;

    /// A FLAC stream with a STREAMINFO block and the given Vorbis comments.
    ///
    /// Metadata ends with a PADDING block followed by a few bytes standing in
    /// for audio frames, the layout tag writers expect from real encoders.
    pub fn flac_bytes(comments: &[(&str, &str)]) -> Vec<u8> {
        let mut bytes = b"fLaC".to_vec();

        // STREAMINFO, not last
        bytes.push(0x00);
        bytes.extend_from_slice(&34u32.to_be_bytes()[1..]);
        bytes.extend_from_slice(&4096u16.to_be_bytes());
        bytes.extend_from_slice(&4096u16.to_be_bytes());
        bytes.extend_from_slice(&[0; 6]);
        // 20 bits sample rate, 3 bits channels - 1, 5 bits bits per sample - 1,
        // 36 bits total samples
        let packed: u64 = (44_100u64 << 44) | (1u64 << 41) | (15u64 << 36);
        bytes.extend_from_slice(&packed.to_be_bytes());
        bytes.extend_from_slice(&[0; 16]);

        // VORBIS_COMMENT, not last
        let mut block = Vec::new();
        let vendor = b"flacport fixtures";
        block.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
        block.extend_from_slice(vendor);
        block.extend_from_slice(&(comments.len() as u32).to_le_bytes());
        for (key, value) in comments {
            let comment = format!("{}={}", key, value);
            block.extend_from_slice(&(comment.len() as u32).to_le_bytes());
            block.extend_from_slice(comment.as_bytes());
        }
        bytes.push(0x04);
        bytes.extend_from_slice(&(block.len() as u32).to_be_bytes()[1..]);
        bytes.extend_from_slice(&block);

        // PADDING, last
        bytes.push(0x80 | 0x01);
        bytes.extend_from_slice(&(FLAC_PADDING_LEN as u32).to_be_bytes()[1..]);
        bytes.extend_from_slice(&[0; FLAC_PADDING_LEN]);

        // Frame sync code, then filler
        bytes.extend_from_slice(&[0xFF, 0xF8]);
        bytes.extend_from_slice(&[0; 30]);

        bytes
    }

    /// A short untagged MPEG-1 Layer III stream of silent frames.
    pub fn mp3_bytes() -> Vec<u8> {
        let mut frame = vec![0u8; MPEG_FRAME_LEN];
        // Sync, MPEG-1 Layer III without CRC, 128 kbit/s, 44.1 kHz, joint stereo
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        frame.repeat(MPEG_FRAME_COUNT)
    }

    /// Prints the last argument's file contents to stdout, like `flac -c -d`.
    pub const CAT_LAST_ARG: &str = r#"for last; do :; done
cat "$last""#;

    /// Copies stdin into the file named by the last argument, like `lame`.
    pub const STDIN_TO_LAST_ARG: &str = r#"for last; do :; done
cat > "$last""#;

    /// Writes a diagnostic to stderr and exits with status 1.
    pub const FAIL_WITH_STDERR: &str = r#"echo "tool failed" >&2
exit 1"#;

    /// Hangs long enough to trip a one second timeout.
    pub const SLEEP: &str = "exec sleep 5";

    /// Records its arguments, one per line, into `args.log` next to itself.
    pub const RECORD_ARGS: &str = r#"for arg; do echo "$arg"; done > "$(dirname "$0")/args.log""#;

    /// Writes an executable shell script standing in for an external tool.
    #[cfg(unix)]
    pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("make script executable");
        path
    }
}
