//! Tracing setup: stderr plus a per-run log file.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// The level comes from `[LOGGING] level` unless `RUST_LOG` is set. The log
/// file is truncated on every run.
pub fn init_tracing(logging: &LoggingConfig, log_path: &Path) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(logging.level_filter().into())
        .from_env_lossy();

    let file = File::create(log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(UtcTime::rfc_3339());

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_timer(UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")
}

/// `log.txt` next to the configuration file.
pub fn log_path_for(config_path: &Path) -> std::path::PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("log.txt")
}
