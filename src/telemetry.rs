//! Structured logging setup.
//!
//! Library code only emits `tracing` events; binaries and test harnesses call
//! [`init_tracing`] once to install a formatting subscriber.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error returned when a global subscriber cannot be installed.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(String);

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// When `RUST_LOG` is unset or invalid, `default_filter` (for example
/// `"info"` or `"orderflow=debug"`) is used instead.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already installed
/// or `default_filter` cannot be parsed.
pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = select_filter(from_env.as_deref(), default_filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError(err.to_string()))
}

fn select_filter(
    from_env: Option<&str>,
    default_filter: &str,
) -> Result<EnvFilter, TelemetryError> {
    match from_env.map(EnvFilter::try_new) {
        Some(Ok(filter)) => Ok(filter),
        _ => EnvFilter::try_new(default_filter).map_err(|err| TelemetryError(err.to_string())),
    }
}
