//! Graph vertices keyed by voxel coordinates.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{AttributeBag, AttributeValue, Coords, EdgeId};

/// Index of a node inside the [`Dag`](crate::Dag) that owns it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A skeleton vertex: a branching point, an endpoint or the root.
///
/// Identity is the coordinate triple alone; two nodes built independently at
/// the same voxel compare and hash equal. `edges` holds non-owning handles to
/// the incident edges, in connection order, and only grows through
/// [`Node::add_edge`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    coords: Coords,
    edges: Vec<EdgeId>,
    attributes: AttributeBag,
}

impl Node {
    #[must_use]
    pub fn new(coords: impl Into<Coords>) -> Self {
        Self {
            coords: coords.into(),
            edges: Vec::new(),
            attributes: AttributeBag::new(),
        }
    }

    #[must_use]
    pub const fn coords(&self) -> Coords {
        self.coords
    }

    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Number of incident edges.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Record an incident edge.
    pub fn add_edge(&mut self, edge: EdgeId) {
        self.edges.push(edge);
    }

    #[must_use]
    pub const fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeBag {
        &mut self.attributes
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key, value);
    }

    /// Same coordinates and attributes, no incident edges.
    #[must_use]
    pub fn copy_without_edges(&self) -> Self {
        Self {
            coords: self.coords,
            edges: Vec::new(),
            attributes: self.attributes.clone(),
        }
    }

    pub(crate) fn clear_attributes(&mut self) {
        self.attributes.clear();
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coords.hash(state);
    }
}
