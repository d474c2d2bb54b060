//! Incremental construction of a [`Dag`].
//!
//! The builder is the only place incidence lists grow: `connect` creates the
//! edge and records it on both endpoints, in that order, so the stored
//! orientation always reads parent to child.

use std::collections::HashMap;

use tracing::debug;

use crate::{Coords, Dag, Edge, EdgeData, EdgeId, GraphError, GraphResult, Node, NodeId};

#[derive(Debug, Default)]
pub struct GraphBuilder {
    id: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    by_coords: HashMap<Coords, NodeId>,
    volume_shape: Option<Coords>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Extent of the scan volume. Defaults to the tight node extent.
    #[must_use]
    pub fn with_volume_shape(mut self, shape: Coords) -> Self {
        self.volume_shape = Some(shape);
        self
    }

    /// Add a node, or return the existing one at the same coordinates.
    pub fn add_node(&mut self, coords: impl Into<Coords>) -> NodeId {
        let coords = coords.into();
        if let Some(&existing) = self.by_coords.get(&coords) {
            return existing;
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(coords));
        self.by_coords.insert(coords, id);
        id
    }

    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    #[must_use]
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index())
    }

    /// Connect `parent` to `child` with zeroed edge data.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::connect_with`].
    pub fn connect(&mut self, parent: NodeId, child: NodeId) -> GraphResult<EdgeId> {
        self.connect_with(parent, child, EdgeData::default())
    }

    /// Connect `parent` to `child`, stored as `node_a = parent`.
    ///
    /// # Errors
    ///
    /// `SelfLoopDetected`, `NodeOutOfRange` for unknown endpoints, or
    /// `EdgeAlreadyExists` if the pair is already connected in either
    /// direction.
    pub fn connect_with(
        &mut self,
        parent: NodeId,
        child: NodeId,
        edge_data: EdgeData,
    ) -> GraphResult<EdgeId> {
        if parent == child {
            return Err(GraphError::SelfLoopDetected(parent));
        }
        let id = EdgeId::new(self.edges.len());
        for node in [parent, child] {
            if self.nodes.get(node.index()).is_none() {
                return Err(GraphError::NodeOutOfRange { node, edge: id });
            }
        }

        let edge = Edge::with_data(parent, child, edge_data);
        if self.edges.contains(&edge) {
            return Err(GraphError::EdgeAlreadyExists(parent, child));
        }
        self.edges.push(edge);

        for node in [parent, child] {
            if let Some(node) = self.nodes.get_mut(node.index()) {
                node.add_edge(id);
            }
        }
        Ok(id)
    }

    /// Finish with `root` as traversal origin.
    ///
    /// # Errors
    ///
    /// `RootMissing` if `root` was never added.
    pub fn build(self, root: NodeId) -> GraphResult<Dag> {
        let volume_shape = match self.volume_shape {
            Some(shape) => shape,
            None => self
                .nodes
                .iter()
                .fold(Coords::ORIGIN, |shape, node| shape.max(node.coords()))
                .extent(),
        };
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Building skeleton graph"
        );
        Ok(Dag::new(root, volume_shape, self.nodes, self.edges)?.with_id(self.id))
    }

    /// [`GraphBuilder::build`] followed by [`Dag::validate`].
    ///
    /// # Errors
    ///
    /// Any construction or validation error.
    pub fn build_validated(self, root: NodeId) -> GraphResult<Dag> {
        let dag = self.build(root)?;
        dag.validate()?;
        Ok(dag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_deduplicates_by_coords() {
        let mut builder = GraphBuilder::new();
        let first = builder.add_node((1, 2, 3));
        let second = builder.add_node(Coords::new(1, 2, 3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_connect_records_incidence_on_both_ends() -> GraphResult<()> {
        let mut builder = GraphBuilder::new();
        let root = builder.add_node((0, 0, 0));
        let child = builder.add_node((0, 0, 1));
        let edge = builder.connect(root, child)?;

        let dag = builder.build(root)?;

        assert_eq!(dag.node(root).map(Node::edges), Some(&[edge][..]));
        assert_eq!(dag.node(child).map(Node::edges), Some(&[edge][..]));
        assert_eq!(dag.edge(edge).map(Edge::endpoints), Some((root, child)));
        Ok(())
    }

    #[test]
    fn test_connect_rejects_reverse_duplicate() -> GraphResult<()> {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node((0, 0, 0));
        let b = builder.add_node((1, 0, 0));
        builder.connect(a, b)?;

        assert_eq!(builder.connect(b, a), Err(GraphError::EdgeAlreadyExists(b, a)));
        Ok(())
    }

    #[test]
    fn test_connect_rejects_self_loop_and_unknown_node() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node((0, 0, 0));

        assert_eq!(builder.connect(a, a), Err(GraphError::SelfLoopDetected(a)));
        assert!(matches!(
            builder.connect(a, NodeId::new(9)),
            Err(GraphError::NodeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_default_volume_shape_is_node_extent() -> GraphResult<()> {
        let mut builder = GraphBuilder::new().with_id("P01");
        let root = builder.add_node((2, 0, 0));
        let tip = builder.add_node((2, 5, 1));
        builder.connect(root, tip)?;

        let dag = builder.build(root)?;

        assert_eq!(dag.volume_shape(), Coords::new(3, 6, 2));
        assert_eq!(dag.id(), "P01");
        Ok(())
    }
}
