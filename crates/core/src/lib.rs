pub mod config;
pub mod deps;
pub mod encoder;
pub mod mirror;
pub mod orchestrator;
pub mod packager;
pub mod playlist;
mod process;
pub mod request;
pub mod tags;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use deps::{check_dependencies, DependencyReport, Tool, ToolStatus};
pub use encoder::{transcode, EncodeJob, Encoder, EncoderConfig, EncoderError, ExternalEncoder};
pub use mirror::{MirrorConfig, MirrorError, MirrorReport, MirrorWalker};
pub use orchestrator::{
    check_tools, plan_requests, resolve_formats, PairOutcome, PairState, RunError,
    RunOrchestrator, RunReport,
};
pub use packager::{CtorrentPackager, Packager, PackagerConfig, PackagerError};
pub use playlist::{Playlist, PlaylistError};
pub use request::{create_output, ConversionRequest, FileClass, FormatSelection, TargetFormat};
pub use tags::{read_tags, transfer_tags, write_tags, TagError, TagFormat, TagSet};
