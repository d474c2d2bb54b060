//! # arbor store
//!
//! Persistence and export for skeleton graphs:
//! - [`codec`]: versioned, compressed graph blobs
//! - [`CaseReader`] / [`CaseData`]: per-case data directories with cached loads
//! - [`StatsWriter`]: timestamped CSV exports of statistics rows

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

mod case;
pub mod codec;
mod error;
pub mod export;
mod reader;

pub use case::CaseData;
pub use codec::{decode_dag, encode_dag, load_dag, save_dag};
pub use error::{StoreError, StoreResult};
pub use export::{StatsWriter, write_edge_statistics, write_generation_summary};
pub use reader::{CaseKind, CaseReader, DAG_EXTENSION, DataStep};
