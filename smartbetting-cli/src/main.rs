//! smartbetting CLI: snapshot NBA teams into the bronze layer.
//!
//! Takes no arguments: each invocation performs exactly one
//! fetch → transform → upload cycle and exits.

use clap::Parser;
use smartbetting_core::{
    ConfigError, PipelineReport, S3Sink, SmartbettingConfig, TeamsPipeline, create_source,
    load_config,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Fetch all NBA teams from balldontlie and upload today's snapshot to S3.
#[derive(Parser, Debug)]
#[command(name = "smartbetting", version, about, long_about = None)]
struct Cli {}

/// Set up tracing: human-readable stderr + JSON file logging.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
fn init_tracing() -> WorkerGuard {
    // Human-readable layer for stderr (always active), RUST_LOG overrides
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(stderr_filter);

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "smartbetting", "smartbetting")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "smartbetting.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

/// Build the source and sink from config and run the pipeline once.
async fn run_snapshot(config: &SmartbettingConfig) -> smartbetting_core::Result<PipelineReport> {
    // Fails here, before any request, when the API key is missing.
    let source = create_source(&config.api)?;
    let sink = Arc::new(S3Sink::new(&config.storage));

    Ok(TeamsPipeline::bronze_teams(source, sink).run().await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let _cli = Cli::parse();
    let _guard = init_tracing();

    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(Some(&workspace))
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
    for warning in config.validate() {
        warn!("{}", warning);
    }

    let report = run_snapshot(&config).await?;
    info!(
        bucket = %report.bucket,
        key = %report.key,
        bytes = report.bytes,
        "Snapshot complete"
    );
    Ok(())
}
