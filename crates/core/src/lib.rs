//! # arbor core
//!
//! Errors, configuration, and logging setup shared by the arbor crates.
//!
//! ## Error Handling
//!
//! All fallible operations return `Result<T, Error>`. Use:
//! - `?` operator for propagation
//! - `map`, `and_then` combinators for transformation
//! - [`ResultExt`] when a failure should be logged and tolerated

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
mod error;
pub mod logging;
mod result;

pub use config::{Config, load_config};
pub use error::Error;
pub use result::{Result, ResultExt};
