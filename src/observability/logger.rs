//! `tracing-subscriber` setup.

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("wsk=trace,info")
        } else {
            EnvFilter::new("wsk=info")
        }
    })
}

/// Install a compact human-readable subscriber
///
/// Fails when a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Install a JSON subscriber for log collectors
pub fn init_json_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(default_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
