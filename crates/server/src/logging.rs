//! Tracing subscriber setup.
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "combat-server.log";
const DEFAULT_FILTER: &str = "info";

/// `RUST_LOG` when it is set and parses, `info` otherwise.
fn filter_or_default<E>(parsed: Result<EnvFilter, E>) -> EnvFilter {
    parsed.unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber: stderr always, plus a file when `log_dir` is set.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<()> {
    let env_filter = filter_or_default(EnvFilter::try_from_default_env());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            // Leak the guard to keep file writer alive
            std::mem::forget(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking_file)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/{}", dir.display(), LOG_FILE);
    }

    Ok(())
}
