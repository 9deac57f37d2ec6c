use std::env;

use thiserror::Error;
use tracing::subscriber::{SetGlobalDefaultError, set_global_default};
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::layer::SubscriberExt;

/// Filter applied when neither `CRYPTKIT_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Errors raised while installing the log subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),
    #[error("could not install tracing subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Log filter directive from `CRYPTKIT_LOG`, then `RUST_LOG`, then the default.
pub fn filter_from_env() -> String {
    env::var("CRYPTKIT_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string())
}

/// Installs the global tracing subscriber.
///
/// Events go to stderr; stdout carries only command output.
///
/// # Errors
///
/// Fails on an invalid filter directive or when a subscriber is already set.
pub fn init_tracing() -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(filter_from_env())?;
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(SystemTime)
            .with_target(true),
    );
    set_global_default(subscriber)?;
    Ok(())
}
