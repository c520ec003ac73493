mod args;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flacport_core::{
    check_dependencies, check_tools, load_config_or_default, plan_requests, resolve_formats,
    validate_config, Config, CtorrentPackager, ExternalEncoder, PairState, RunOrchestrator,
    SanitizedConfig, Tool,
};

use args::Args;

/// Exit status of `--check-deps` when a tool is missing.
const EXIT_MISSING_TOOLS: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = build_config(&args)?;

    if args.check_deps {
        return Ok(report_dependencies(&config));
    }

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration: {:?}", SanitizedConfig::from(&config));

    let formats = resolve_formats(args.format_selection(), args.sample_rate)?;
    check_tools(&config, &formats)?;

    let encoder = Arc::new(ExternalEncoder::new(config.encoder.clone()));
    let packager = if config.packager.enabled {
        Some(Arc::new(
            CtorrentPackager::new(config.packager.clone())
                .context("Failed to set up torrent packaging")?,
        ))
    } else {
        info!("Torrent packaging disabled");
        None
    };

    let orchestrator = RunOrchestrator::new(encoder, packager, config.mirror.clone());
    let requests = plan_requests(&args.directories, &formats);
    let report = orchestrator.run(&requests).await;

    for pair in &report.pairs {
        let target = pair
            .output_dir
            .as_deref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| pair.version_label.clone());
        match (pair.state, &pair.error) {
            (PairState::Done, None) => info!(
                "{} -> {}: {} failed files",
                pair.input.display(),
                target,
                pair.failed_files()
            ),
            (_, error) => warn!(
                "{} -> {}: {} ({})",
                pair.input.display(),
                target,
                pair.state,
                error.as_deref().unwrap_or("no details")
            ),
        }
    }

    if !report.is_clean() {
        warn!(
            "Finished with problems: {} failed files",
            report.failed_files()
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Loads the configuration file, if any, and applies command line overrides.
fn build_config(args: &Args) -> Result<Config> {
    info!("Loading configuration from {:?}", args.config);
    let mut config = load_config_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    if let Some(tracker) = &args.tracker {
        config = config.with_announce_url(tracker.clone());
    }
    if args.no_torrent {
        config = config.without_packaging();
    }
    Ok(config)
}

/// Prints the availability of every tool and returns the exit status.
fn report_dependencies(config: &Config) -> ExitCode {
    let report = check_dependencies(config, &Tool::ALL);
    for status in &report.tools {
        println!("{}", status);
    }

    if report.all_available() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_MISSING_TOOLS)
    }
}
