//! File-based logging for the TUI session.
//!
//! Logs go to a daily-rolling file under ${NEWSBEE_HOME}/logs rather than
//! stdout/stderr, which the alternate screen owns while the TUI runs. The
//! NEWSBEE_LOG environment variable selects the filter (default "info").

use anyhow::{Context, Result};
use newsbee_core::config::paths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter directive.
const LOG_FILTER_ENV: &str = "NEWSBEE_LOG";

/// Initializes the global tracing subscriber.
///
/// Returns a worker guard that must stay alive for the process lifetime;
/// buffered log lines are lost once it drops.
///
/// # Errors
/// Returns an error if the logs directory cannot be created or the filter
/// directive is invalid.
pub fn init() -> Result<WorkerGuard> {
    let logs_dir = paths::logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Invalid log filter")?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "newsbee.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
