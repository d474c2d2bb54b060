//! Graph-specific error types

use thiserror::Error;

use crate::{Coords, EdgeId, NodeId};

/// Graph-specific error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Generation not found: {0}")]
    GenerationNotFound(i64),

    #[error("Root node {0} is not part of the graph")]
    RootMissing(NodeId),

    #[error("Node {node} referenced by edge {edge} is not part of the graph")]
    NodeOutOfRange { node: NodeId, edge: EdgeId },

    #[error("Edge {edge} referenced by node {node} is not part of the graph")]
    EdgeOutOfRange { edge: EdgeId, node: NodeId },

    #[error("Edge {edge} is listed on node {node} but does not touch it")]
    DanglingIncidence { edge: EdgeId, node: NodeId },

    #[error("Edge {edge} is not listed on its parent endpoint {node}")]
    MissingIncidence { edge: EdgeId, node: NodeId },

    #[error("Node {0} already connected to {1}")]
    EdgeAlreadyExists(NodeId, NodeId),

    #[error("Self-loop detected: {0}")]
    SelfLoopDetected(NodeId),

    #[error("Cycle detected in skeleton graph")]
    CycleDetected,

    #[error("Graph is not connected: {components} components")]
    Disconnected { components: usize },

    #[error("Edge {edge} is not oriented parent -> child from the root")]
    Misoriented { edge: EdgeId },

    #[error("Node {coords} has {degree} edges hence cannot be removed")]
    UnsupportedRemoval { coords: Coords, degree: usize },

    #[error("Voxel grid of extent {0} is too large to allocate")]
    GridTooLarge(Coords),

    #[error("Not yet implemented: {0}")]
    NotImplemented(String),

    #[error("Attribute '{key}' expects {expected}, got {found}")]
    AttributeType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl GraphError {
    pub fn not_implemented(what: impl Into<String>) -> Self {
        Self::NotImplemented(what.into())
    }

    pub fn attribute_type(key: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::AttributeType {
            key: key.into(),
            expected,
            found,
        }
    }
}

/// Result type for graph operations
pub type GraphResult<T> = std::result::Result<T, GraphError>;
