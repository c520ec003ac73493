//! Run orchestrator implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::deps::{check_dependencies, Tool};
use crate::encoder::Encoder;
use crate::mirror::{MirrorConfig, MirrorWalker};
use crate::packager::Packager;
use crate::playlist::Playlist;
use crate::request::{ConversionRequest, FormatSelection, TargetFormat};

use super::types::{PairOutcome, PairState, RunError, RunReport};

/// Resolves the selected formats, failing when a resample has no rate.
pub fn resolve_formats(
    selection: FormatSelection,
    sample_rate: Option<u32>,
) -> Result<Vec<TargetFormat>, RunError> {
    if sample_rate == Some(0) {
        return Err(RunError::Configuration(
            "sample rate must be greater than 0".to_string(),
        ));
    }
    selection.resolve(sample_rate).ok_or_else(|| {
        RunError::Configuration("a sample rate is required for FLAC resampling".to_string())
    })
}

/// Fails with [`RunError::ToolMissing`] unless every tool the run needs is
/// installed.
pub fn check_tools(config: &Config, formats: &[TargetFormat]) -> Result<(), RunError> {
    let required = Tool::required_for(formats, config.packager.enabled);
    let report = check_dependencies(config, &required);
    for status in &report.tools {
        if !status.is_available() {
            error!("Required tool {}", status);
        }
    }

    let missing = report.missing();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(RunError::ToolMissing(missing))
    }
}

/// Expands inputs and formats into requests, inputs first.
///
/// Relative inputs are made absolute so the sibling output directory can
/// always be derived.
pub fn plan_requests(inputs: &[PathBuf], formats: &[TargetFormat]) -> Vec<ConversionRequest> {
    inputs
        .iter()
        .map(|input| std::path::absolute(input).unwrap_or_else(|_| input.clone()))
        .flat_map(|input| {
            formats
                .iter()
                .map(move |format| ConversionRequest::new(input.clone(), *format))
        })
        .collect()
}

/// Drives the walker, playlist and packager for each requested pair.
pub struct RunOrchestrator<E, P>
where
    E: Encoder + ?Sized,
    P: Packager + ?Sized,
{
    encoder: Arc<E>,
    packager: Option<Arc<P>>,
    mirror_config: MirrorConfig,
}

impl<E, P> RunOrchestrator<E, P>
where
    E: Encoder + ?Sized,
    P: Packager + ?Sized,
{
    /// Creates an orchestrator. Without a packager no torrents are made.
    pub fn new(encoder: Arc<E>, packager: Option<Arc<P>>, mirror_config: MirrorConfig) -> Self {
        Self {
            encoder,
            packager,
            mirror_config,
        }
    }

    /// Processes every request in order and reports on each.
    pub async fn run(&self, requests: &[ConversionRequest]) -> RunReport {
        let mut report = RunReport::default();
        for request in requests {
            let outcome = self.run_pair(request).await;
            info!(
                "{} [{}]: {}",
                outcome.input.display(),
                outcome.version_label,
                outcome.state
            );
            report.pairs.push(outcome);
        }
        report
    }

    /// Processes one (input directory, version) pair.
    pub async fn run_pair(&self, request: &ConversionRequest) -> PairOutcome {
        let mut outcome = PairOutcome::new(
            &request.input_directory,
            &request.output_version_label,
        );

        outcome.state = PairState::ValidatingInput;
        let input = request.input_directory.as_path();
        if !is_directory(input).await {
            warn!("Skipping {}: not a directory", input.display());
            outcome.end(PairState::Skipped, "input is not a directory");
            return outcome;
        }
        let Some(output_dir) = request.output_directory() else {
            warn!("Skipping {}: no directory name", input.display());
            outcome.end(PairState::Skipped, "input has no directory name");
            return outcome;
        };
        outcome.output_dir = Some(output_dir.clone());

        info!(
            "Converting {} to {} ...",
            input.display(),
            request.output_version_label
        );

        if !is_directory(&output_dir).await {
            info!("Creating directory {} ...", output_dir.display());
            if let Err(e) = tokio::fs::create_dir_all(&output_dir).await {
                error!("Failed to create {}: {}", output_dir.display(), e);
                outcome.end(PairState::Failed, format!("cannot create output: {e}"));
                return outcome;
            }
        }

        outcome.state = PairState::Mirroring;
        let walker = MirrorWalker::new(self.encoder.as_ref(), &self.mirror_config);
        let mut playlist = Playlist::new(&output_dir);
        match walker.mirror(request, &output_dir, &mut playlist).await {
            Ok(mirror) => {
                if !mirror.is_clean() {
                    warn!(
                        "{} of {} files in {} failed",
                        mirror.failed,
                        mirror.total(),
                        input.display()
                    );
                }
                outcome.mirror = Some(mirror);
            }
            Err(e) => {
                error!("Failed to mirror {}: {}", input.display(), e);
                outcome.end(PairState::Failed, e.to_string());
                return outcome;
            }
        }

        outcome.state = PairState::Playlisting;
        match playlist.write().await {
            Ok(path) => outcome.playlist = Some(path),
            Err(e) => {
                error!("{}", e);
                outcome.end(PairState::Failed, e.to_string());
                return outcome;
            }
        }

        if let Some(packager) = &self.packager {
            outcome.state = PairState::Packaging;
            match packager.package(&output_dir).await {
                Ok(result) => {
                    info!(
                        "Created {} ({} bytes)",
                        result.descriptor_path.display(),
                        result.size_bytes
                    );
                    outcome.archive = Some(result.descriptor_path);
                }
                Err(e) => {
                    error!("Packaging {} failed: {}", output_dir.display(), e);
                    outcome.error = Some(format!("packaging failed: {e}"));
                }
            }
        }

        outcome.state = PairState::Done;
        outcome
    }
}

async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
