//! Types for the run orchestrator.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::deps::Tool;
use crate::mirror::MirrorReport;

/// Errors that abort a run before any directory is touched.
#[derive(Debug, Error)]
pub enum RunError {
    /// The requested run cannot be carried out as configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Required external tools are not installed.
    #[error("missing required tools: {}", tool_list(.0))]
    ToolMissing(Vec<Tool>),
}

fn tool_list(tools: &[Tool]) -> String {
    tools
        .iter()
        .map(Tool::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Progress of one (input directory, version) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairState {
    Pending,
    ValidatingInput,
    /// The input was not a usable directory.
    Skipped,
    Mirroring,
    Playlisting,
    Packaging,
    Done,
    /// The output directory or playlist could not be written.
    Failed,
}

impl PairState {
    /// Whether processing of the pair has ended.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Skipped | Self::Done | Self::Failed)
    }
}

impl fmt::Display for PairState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::ValidatingInput => "validating input",
            Self::Skipped => "skipped",
            Self::Mirroring => "mirroring",
            Self::Playlisting => "playlisting",
            Self::Packaging => "packaging",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What happened to one (input directory, version) pair.
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    pub input: PathBuf,
    pub version_label: String,
    pub output_dir: Option<PathBuf>,
    pub state: PairState,
    pub mirror: Option<MirrorReport>,
    pub playlist: Option<PathBuf>,
    /// The torrent descriptor, when packaging succeeded.
    pub archive: Option<PathBuf>,
    /// Why the pair was skipped or failed, or why packaging did not succeed.
    pub error: Option<String>,
}

impl PairOutcome {
    pub fn new(input: impl Into<PathBuf>, version_label: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            version_label: version_label.into(),
            output_dir: None,
            state: PairState::Pending,
            mirror: None,
            playlist: None,
            archive: None,
            error: None,
        }
    }

    /// Moves the pair to a terminal state with a reason.
    pub(crate) fn end(&mut self, state: PairState, error: impl Into<String>) {
        self.state = state;
        self.error = Some(error.into());
    }

    /// Number of files that failed to convert or copy.
    pub fn failed_files(&self) -> usize {
        self.mirror.as_ref().map_or(0, |report| report.failed)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub pairs: Vec<PairOutcome>,
}

impl RunReport {
    /// Pairs in the given state.
    pub fn in_state(&self, state: PairState) -> impl Iterator<Item = &PairOutcome> {
        self.pairs.iter().filter(move |pair| pair.state == state)
    }

    /// Number of files that failed across all pairs.
    pub fn failed_files(&self) -> usize {
        self.pairs.iter().map(PairOutcome::failed_files).sum()
    }

    /// Whether every pair completed without any failure.
    pub fn is_clean(&self) -> bool {
        self.pairs
            .iter()
            .all(|pair| pair.state == PairState::Done && pair.error.is_none())
            && self.failed_files() == 0
    }
}
