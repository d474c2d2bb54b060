//! # arbor graph
//!
//! Skeleton graph model of branching anatomical trees.
//!
//! A [`Dag`] owns [`Node`]s keyed by voxel [`Coords`] and undirected
//! [`Edge`]s carrying [`EdgeData`] measurements. Generation queries are all
//! built on one breadth-first walk from the root, driven by a
//! [`TraverseListener`].
//!
//! ```
//! use arbor_graph::{CountingListener, EdgeData, GraphBuilder};
//!
//! let mut builder = GraphBuilder::new();
//! let root = builder.add_node((0, 0, 0));
//! let tip = builder.add_node((0, 0, 5));
//! builder
//!     .connect_with(root, tip, EdgeData { generation: 1, ..EdgeData::default() })
//!     .map_err(|e| e.to_string())?;
//! let dag = builder.build_validated(root).map_err(|e| e.to_string())?;
//!
//! let mut counter = CountingListener::new();
//! dag.traverse_from_root(&mut counter);
//! assert_eq!(counter.total(), 1);
//! # Ok::<(), String>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

mod attributes;
mod builder;
mod coords;
mod dag;
mod edge;
mod edge_data;
mod error;
pub mod listener;
mod node;
pub mod stats;
mod validate;
pub mod voxels;

pub use attributes::{AttributeBag, AttributeValue};
pub use builder::GraphBuilder;
pub use coords::Coords;
pub use dag::Dag;
pub use edge::{Edge, EdgeId, mirrored_keys};
pub use edge_data::EdgeData;
pub use error::{GraphError, GraphResult};
pub use listener::{
    CountingListener, EdgeFilter, EdgeView, FnListener, GenerationCollector, TraverseListener,
};
pub use node::{Node, NodeId};
pub use stats::{EdgeStatistics, GenerationSummary};
pub use voxels::VoxelGrid;
