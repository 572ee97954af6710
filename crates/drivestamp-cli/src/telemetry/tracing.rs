//! Tracing initialization.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence. Otherwise the level is `info`, or `debug`
/// with `--verbose`.
///
/// ```bash
/// drivestamp -v FOLDER_ID 2025-10-20T09:20:25.000Z
/// RUST_LOG=drivestamp_core=debug,drivestamp_reqwest=trace drivestamp FOLDER_ID 2025-10-20T09:20:25.000Z
/// ```
pub(super) fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let env_filter = create_env_filter(verbose)?;
    let fmt_layer = create_fmt_layer();

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn create_env_filter(verbose: bool) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}

fn create_fmt_layer() -> fmt::Layer<tracing_subscriber::Registry> {
    fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_ansi(true)
}
