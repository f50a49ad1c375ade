#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod batch;
mod config;
mod shutdown;

use std::process;

use anyhow::Context;
use docpredict_client::PredictionClient;
use tokio_util::sync::CancellationToken;

use crate::batch::BatchRunner;
use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "docpredict_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "docpredict_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "docpredict_cli::config";
pub const TRACING_TARGET_BATCH: &str = "docpredict_cli::batch";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting docpredict"
    );
    cli.log();
    cli.validate()?;

    let client_config = cli.service.client_config()?;
    let client = PredictionClient::new(client_config).context("failed to create prediction client")?;
    let runner = BatchRunner::new(client, &cli.batch);

    let cancel = CancellationToken::new();
    let signals = tokio::spawn(shutdown::cancel_on_signal(cancel.clone()));

    let report = runner.run(&cli.batch.input_dir, &cancel).await;
    cancel.cancel();
    let _ = signals.await;

    let report = report.context("batch run failed")?;
    if report.cancelled {
        anyhow::bail!(
            "batch cancelled after {} documents",
            report.processed.len() + report.failed.len()
        );
    }
    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} of {} documents failed",
            report.failed.len(),
            report.processed.len() + report.failed.len()
        );
    }

    Ok(())
}
