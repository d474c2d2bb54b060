//! Structural validation.
//!
//! Traversal assumes a connected, acyclic graph whose edges are stored
//! parent to child from the root. [`Dag::new`] only checks handles; this
//! module checks the rest by mirroring the graph into petgraph.

use petgraph::algo::{connected_components, dijkstra, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::{Dag, EdgeId, GraphError, GraphResult, NodeId};

impl Dag {
    /// Undirected petgraph copy; node and edge indices match the arenas.
    #[must_use]
    pub fn to_petgraph(&self) -> UnGraph<NodeId, EdgeId> {
        let mut graph = UnGraph::with_capacity(self.node_count(), self.edge_count());
        for (id, _) in self.nodes_with_ids() {
            graph.add_node(id);
        }
        for (id, edge) in self.edges_with_ids() {
            graph.add_edge(
                NodeIndex::new(edge.node_a().index()),
                NodeIndex::new(edge.node_b().index()),
                id,
            );
        }
        graph
    }

    /// Check the tree invariants traversal relies on.
    ///
    /// # Errors
    ///
    /// - handle errors from [`Dag::check_references`]
    /// - `MissingIncidence` if an edge is not listed on one of its endpoints
    /// - `CycleDetected` for any undirected cycle, parallel edges included
    /// - `Disconnected` if some node cannot be reached from the root
    /// - `Misoriented` if an edge's `node_a` is not nearer the root than
    ///   its `node_b`
    pub fn validate(&self) -> GraphResult<()> {
        self.check_references()?;

        for (id, edge) in self.edges_with_ids() {
            for node in [edge.node_a(), edge.node_b()] {
                let listed = self
                    .node(node)
                    .is_some_and(|candidate| candidate.edges().contains(&id));
                if !listed {
                    return Err(GraphError::MissingIncidence { edge: id, node });
                }
            }
        }

        let graph = self.to_petgraph();
        if is_cyclic_undirected(&graph) {
            return Err(GraphError::CycleDetected);
        }

        let components = connected_components(&graph);
        if components > 1 {
            return Err(GraphError::Disconnected { components });
        }

        let depth = dijkstra(&graph, NodeIndex::new(self.root().index()), None, |_| 1_usize);
        for (id, edge) in self.edges_with_ids() {
            let parent = depth.get(&NodeIndex::new(edge.node_a().index()));
            let child = depth.get(&NodeIndex::new(edge.node_b().index()));
            match (parent, child) {
                (Some(parent), Some(child)) if parent < child => {}
                _ => return Err(GraphError::Misoriented { edge: id }),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Coords, Dag, Edge, EdgeId, GraphBuilder, GraphError, GraphResult, Node, NodeId};

    #[test]
    fn test_builder_tree_is_valid() -> GraphResult<()> {
        let mut builder = GraphBuilder::new();
        let root = builder.add_node((0, 0, 0));
        let left = builder.add_node((1, 0, 0));
        let right = builder.add_node((0, 1, 0));
        builder.connect(root, left)?;
        builder.connect(root, right)?;

        builder.build_validated(root).map(|_| ())
    }

    #[test]
    fn test_reversed_edge_is_misoriented() -> GraphResult<()> {
        let mut builder = GraphBuilder::new();
        let root = builder.add_node((0, 0, 0));
        let mid = builder.add_node((1, 0, 0));
        let tip = builder.add_node((2, 0, 0));
        builder.connect(root, mid)?;
        let backwards = builder.connect(tip, mid)?;

        let result = builder.build_validated(root);

        assert_eq!(result.err(), Some(GraphError::Misoriented { edge: backwards }));
        Ok(())
    }

    #[test]
    fn test_triangle_is_cyclic() -> GraphResult<()> {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node((0, 0, 0));
        let b = builder.add_node((1, 0, 0));
        let c = builder.add_node((0, 1, 0));
        builder.connect(a, b)?;
        builder.connect(b, c)?;
        builder.connect(c, a)?;

        assert_eq!(builder.build_validated(a).err(), Some(GraphError::CycleDetected));
        Ok(())
    }

    #[test]
    fn test_island_is_disconnected() -> GraphResult<()> {
        let mut builder = GraphBuilder::new();
        let root = builder.add_node((0, 0, 0));
        let child = builder.add_node((1, 0, 0));
        builder.add_node((5, 5, 5));
        builder.connect(root, child)?;

        assert_eq!(
            builder.build_validated(root).err(),
            Some(GraphError::Disconnected { components: 2 })
        );
        Ok(())
    }

    #[test]
    fn test_unlisted_child_incidence() -> GraphResult<()> {
        let mut nodes = vec![Node::new((0, 0, 0)), Node::new((1, 0, 0))];
        nodes[0].add_edge(EdgeId::new(0));
        let edges = vec![Edge::new(NodeId::new(0), NodeId::new(1))];
        let dag = Dag::new(NodeId::new(0), Coords::ORIGIN, nodes, edges)?;

        assert_eq!(
            dag.validate(),
            Err(GraphError::MissingIncidence {
                edge: EdgeId::new(0),
                node: NodeId::new(1)
            })
        );
        Ok(())
    }
}
