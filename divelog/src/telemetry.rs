//! Tracing initialization.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and the fmt layer. `RUST_LOG`
//! takes precedence; otherwise the `log_filter` value from the configuration is used.
//!
//! Repository operations are instrumented with `#[instrument(..., err)]`, so running with
//! `RUST_LOG=divelog=debug` shows one span per query with its arguments and any error.

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build the filter: `RUST_LOG` if set and valid, then `fallback`, then plain `info`
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize console tracing. Fails if a global subscriber is already installed.
pub fn init_telemetry(log_filter: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(log_filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    info!("Telemetry initialized");
    Ok(())
}

