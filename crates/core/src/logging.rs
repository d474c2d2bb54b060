//! Tracing subscriber setup shared by the binary and integration tests.

use std::time::Instant;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{Error, Result};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when it is set and parsable.
///
/// # Errors
///
/// Returns `Error::LoggingInitFailed` if `default_filter` is not a valid
/// directive or a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| Error::LoggingInitFailed {
            reason: format!("invalid filter '{default_filter}': {e}"),
        })?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| Error::LoggingInitFailed {
            reason: e.to_string(),
        })
}

/// Run `f`, emitting debug events when it starts and ends with its duration.
pub fn timed<T, F: FnOnce() -> T>(name: &str, f: F) -> T {
    tracing::debug!("{name} started");
    let start = Instant::now();
    let value = f();
    tracing::debug!(
        "{name} ended. Execution time: {:.3} s",
        start.elapsed().as_secs_f64()
    );
    value
}
