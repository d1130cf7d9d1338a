//! Logging setup and per-component spans.
//!
//! The subscriber is installed once by each binary. Library components never
//! touch it; they receive a [`tracing::Span`] at construction and emit their
//! events inside it.

use crate::core::{PortsError, Result};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins; otherwise `PORTS_LOG_LEVEL` or `info` is used, and
/// `debug` forces the debug level.
pub fn init(debug: bool) -> Result<()> {
    let env_log_level = std::env::var("PORTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_level = if debug { "debug" } else { env_log_level.as_str() };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(debug)
                .compact(),
        )
        .try_init()
        .map_err(|e| PortsError::config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Span identifying one component in log output.
pub fn component_span(name: &'static str) -> Span {
    tracing::info_span!("component", logger = name)
}
