#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # arbor
//!
//! Skeleton-graph analysis of branching vascular trees.
//!
//! This library re-exports the arbor workspace crates and hosts the
//! command line surface.

pub use arbor_core;
pub use arbor_graph;
pub use arbor_store;

pub mod cli;
pub mod commands;
