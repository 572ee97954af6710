#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod telemetry;

use std::process;

use drivestamp_core::{TraversalEngine, TraversalReport};
use drivestamp_reqwest::DriveClient;

use crate::config::Cli;
use crate::error::{CliError, EXIT_FAILURE};

// Tracing target constants
pub const TRACING_TARGET_CONFIG: &str = "drivestamp_cli::config";
pub const TRACING_TARGET_RUN: &str = "drivestamp_cli::run";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::init();

    if let Err(error) = telemetry::init_tracing(cli.verbose) {
        eprintln!("Error: {error:#}");
        process::exit(EXIT_FAILURE);
    }

    let Err(error) = run(cli).await else {
        process::exit(0);
    };

    let exit_code = error
        .downcast_ref::<CliError>()
        .map_or(EXIT_FAILURE, CliError::exit_code);
    let suggestion = error.downcast_ref::<CliError>().and_then(CliError::suggestion);
    let error_code = error.downcast_ref::<CliError>().map(CliError::error_code);

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_RUN,
            error = %format!("{error:#}"),
            error_code,
            suggestion,
            exit_code,
            "Run failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(exit_code);
}

/// Validates arguments, builds the Drive client and stamps the folder tree.
async fn run(cli: Cli) -> anyhow::Result<()> {
    cli.log();
    cli.validate()?;

    let modified_time = cli.modified_time()?;
    let credentials = cli.credentials_path()?;

    let client = DriveClient::from_credentials_file(cli.http.clone(), credentials)
        .await
        .map_err(CliError::Client)?;

    let engine = TraversalEngine::new(client.into_service(), cli.traversal_options());
    let report = engine
        .run(&cli.folder_id, &modified_time)
        .await
        .map_err(CliError::Drive)?;

    log_report(&report, cli.dry_run);
    Ok(())
}

fn log_report(report: &TraversalReport, dry_run: bool) {
    tracing::info!(
        target: TRACING_TARGET_RUN,
        dry_run,
        folders = report.containers_updated,
        files = report.items_updated,
        skipped = report.skipped,
        list_calls = report.list_calls,
        elapsed_ms = report.elapsed.as_millis(),
        "All done"
    );
}
