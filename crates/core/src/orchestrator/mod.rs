//! Run orchestrator driving every (input directory, version) pair.
//!
//! Pairs are processed one at a time, inputs first and versions within each
//! input. Each pair moves through the states of [`PairState`]:
//!
//! ```text
//! Pending -> ValidatingInput -> Skipped
//!                            -> Mirroring -> Playlisting -> Packaging -> Done
//! ```
//!
//! Only pre-flight problems (an unusable format selection, missing tools)
//! fail the run as a whole. Everything after that is recorded per pair in
//! the [`RunReport`].

mod runner;
mod types;

pub use runner::{check_tools, plan_requests, resolve_formats, RunOrchestrator};
pub use types::{PairOutcome, PairState, RunError, RunReport};
