//! Command line arguments.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use flacport_core::FormatSelection;

/// Convert FLAC albums to MP3 or resampled FLAC, write playlists and create
/// torrents for the results.
#[derive(Parser, Debug)]
#[command(name = "flacport", version, about, long_about = None)]
#[command(group(ArgGroup::new("format").args(["v0", "mp3", "flac", "all"])))]
pub struct Args {
    /// Album directories to convert.
    #[arg(required_unless_present = "check_deps")]
    pub directories: Vec<PathBuf>,

    /// Enable debug logging.
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Convert to MP3 V0 (VBR) only.
    #[arg(long)]
    pub v0: bool,

    /// Convert to MP3 320 (CBR) only.
    #[arg(long)]
    pub mp3: bool,

    /// Convert to 16 bit FLAC at --sample-rate only.
    #[arg(long)]
    pub flac: bool,

    /// Convert to every format (the default).
    #[arg(long)]
    pub all: bool,

    /// Sample rate in Hz for FLAC conversion, e.g. 44100.
    #[arg(short = 's', long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Tracker announce URL, overrides the configuration file.
    #[arg(short = 't', long, env = "FLACPORT_TRACKER", value_name = "URL")]
    pub tracker: Option<String>,

    /// Do not create torrents.
    #[arg(long)]
    pub no_torrent: bool,

    /// Report which external tools are installed and exit.
    #[arg(long)]
    pub check_deps: bool,

    /// Configuration file.
    #[arg(
        short,
        long,
        env = "FLACPORT_CONFIG",
        default_value = "flacport.toml",
        value_name = "FILE"
    )]
    pub config: PathBuf,
}

impl Args {
    /// The formats selected by the mutually exclusive format flags.
    pub fn format_selection(&self) -> FormatSelection {
        if self.v0 {
            FormatSelection::Vbr0
        } else if self.mp3 {
            FormatSelection::Cbr320
        } else if self.flac {
            FormatSelection::FlacResample
        } else {
            FormatSelection::All
        }
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
