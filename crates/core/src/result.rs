//! Result type definition and extension traits.
//!
//! Provides a logging combinator for Result types, so callers that want to
//! degrade gracefully can do so without unwrap/expect/panic.

use crate::error::Error;

/// The standard Result type for arbor core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for any `Result` whose error can be displayed.
pub trait ResultExt {
    /// Log the error at warn level with a context message and pass the Result through.
    #[must_use]
    fn warn_on_err(self, context: &str) -> Self;
}

impl<T, E: std::fmt::Display> ResultExt for std::result::Result<T, E> {
    fn warn_on_err(self, context: &str) -> Self {
        if let Err(ref e) = self {
            tracing::warn!("{context}: {e}");
        }
        self
    }
}
