//! Tracing subscriber setup

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}
