//! # Skeleton DAG
//!
//! Root-anchored tree of skeleton nodes with generation-aware traversal and
//! memoized generation queries.
//!
//! The graph owns its nodes and edges in two arenas; [`NodeId`] and
//! [`EdgeId`] are indices into them. Query results are cached per instance
//! and every `&mut` accessor drops the caches, so a cached answer never
//! outlives the structure it was computed from.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::listener::{EdgeView, GenerationCollector, TraverseListener};
use crate::{AttributeBag, AttributeValue, Coords, Edge, EdgeId, GraphError, GraphResult, Node, NodeId};

/// Lazily computed query results.
#[derive(Debug, Default)]
struct QueryCache {
    generations: OnceLock<BTreeMap<u32, Vec<NodeId>>>,
    full_levels: OnceLock<usize>,
    by_degree: Mutex<HashMap<usize, Vec<NodeId>>>,
}

/// Skeleton graph of one branching structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Dag {
    id: String,
    root: NodeId,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    volume_shape: Coords,
    attributes: AttributeBag,
    #[serde(skip)]
    cache: QueryCache,
    #[serde(skip)]
    traversals: AtomicUsize,
}

impl Clone for Dag {
    /// Deep copy with empty caches.
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            root: self.root,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            volume_shape: self.volume_shape,
            attributes: self.attributes.clone(),
            cache: QueryCache::default(),
            traversals: AtomicUsize::new(0),
        }
    }
}

impl Dag {
    /// Assemble a graph from complete inputs.
    ///
    /// Node and edge handles must already be consistent: the root and every
    /// edge endpoint must index into `nodes`, and every edge listed on a
    /// node must touch it. Connectivity and orientation are not checked
    /// here; see [`Dag::validate`].
    ///
    /// Node coords are expected to be unique but this is not enforced.
    /// [`Edge`] equality compares node handles, so two nodes at the same
    /// position give unequal edges; [`Dag::get_edge`] compares positions.
    ///
    /// # Errors
    ///
    /// Returns the first dangling handle found.
    pub fn new(
        root: NodeId,
        volume_shape: Coords,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> GraphResult<Self> {
        let dag = Self {
            id: String::new(),
            root,
            nodes,
            edges,
            volume_shape,
            attributes: AttributeBag::new(),
            cache: QueryCache::default(),
            traversals: AtomicUsize::new(0),
        };
        dag.check_references()?;
        Ok(dag)
    }

    /// Check that every handle stored in the graph resolves.
    ///
    /// # Errors
    ///
    /// `RootMissing`, `NodeOutOfRange`, `EdgeOutOfRange` or
    /// `DanglingIncidence` for the first bad handle.
    pub fn check_references(&self) -> GraphResult<()> {
        if self.node(self.root).is_none() {
            return Err(GraphError::RootMissing(self.root));
        }

        for (id, edge) in self.edges_with_ids() {
            for node in [edge.node_a(), edge.node_b()] {
                if self.node(node).is_none() {
                    return Err(GraphError::NodeOutOfRange { node, edge: id });
                }
            }
        }

        for (id, node) in self.nodes_with_ids() {
            for &edge_id in node.edges() {
                let edge = self.edge(edge_id).ok_or(GraphError::EdgeOutOfRange {
                    edge: edge_id,
                    node: id,
                })?;
                if edge.other_end(id).is_none() {
                    return Err(GraphError::DanglingIncidence {
                        edge: edge_id,
                        node: id,
                    });
                }
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The root node. Always present after construction.
    #[must_use]
    pub fn root_node(&self) -> Option<&Node> {
        self.node(self.root)
    }

    #[must_use]
    pub const fn volume_shape(&self) -> Coords {
        self.volume_shape
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes_with_ids(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::new(index), node))
    }

    pub fn edges_with_ids(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(index, edge)| (EdgeId::new(index), edge))
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Mutable node access. Drops every cached query result.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.invalidate_caches();
        self.nodes.get_mut(id.index())
    }

    /// Mutable edge access. Drops every cached query result.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.invalidate_caches();
        self.edges.get_mut(id.index())
    }

    pub fn invalidate_caches(&mut self) {
        self.cache = QueryCache::default();
    }

    /// Number of root-anchored walks run on this instance.
    #[must_use]
    pub fn traversal_count(&self) -> usize {
        self.traversals.load(Ordering::Relaxed)
    }

    #[must_use]
    pub const fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key, value);
    }

    /// Breadth-first walk from the root with no generation bound.
    pub fn traverse_from_root<L: TraverseListener>(&self, listener: L) {
        self.traverse_from_root_bounded(listener, None);
    }

    /// Breadth-first walk from the root.
    ///
    /// Each dequeued node reports the incident edges it is the parent end of
    /// (`edge.node_a() == node`), in connection order; the edge back to the
    /// parent is skipped. An edge's child end is expanded only while its
    /// generation is below `max_generation`; edges at or past the bound are
    /// still reported.
    ///
    /// Terminates on any graph that passes [`Dag::validate`]. A cycle in
    /// stored orientation makes the walk run forever.
    pub fn traverse_from_root_bounded<L: TraverseListener>(
        &self,
        mut listener: L,
        max_generation: Option<u32>,
    ) {
        self.traversals.fetch_add(1, Ordering::Relaxed);

        let mut queue: VecDeque<(Option<EdgeId>, NodeId)> = VecDeque::from([(None, self.root)]);
        while let Some((parent, node_id)) = queue.pop_front() {
            let Some(node) = self.node(node_id) else {
                continue;
            };
            let parent_view = parent.and_then(|id| self.edge(id).map(|edge| EdgeView::new(id, edge)));

            for &edge_id in node.edges() {
                let Some(edge) = self.edge(edge_id) else {
                    continue;
                };
                if edge.node_a() != node_id {
                    continue;
                }
                listener.on_edge_traversed(parent_view, EdgeView::new(edge_id, edge));
                if max_generation.is_none_or(|max| edge.generation() < max) {
                    queue.push_back((Some(edge_id), edge.node_b()));
                }
            }
        }
    }

    /// Nodes bucketed by the generation of the edge that reaches them.
    ///
    /// Bucket 0 holds the root. Computed by one traversal and cached.
    pub fn get_generation_node_dict(&self) -> &BTreeMap<u32, Vec<NodeId>> {
        self.cache.generations.get_or_init(|| {
            let mut collector = GenerationCollector::new();
            self.traverse_from_root(&mut collector);
            let mut buckets = collector.into_buckets();
            buckets.entry(0).or_insert_with(|| vec![self.root]);
            debug!(generations = buckets.len(), "Generation buckets computed");
            buckets
        })
    }

    /// Number of leading generations holding exactly `2^g` nodes.
    ///
    /// Counting stops at the first generation that falls short, even if a
    /// later one happens to match. A generation with no bucket holds no
    /// nodes and stops the count too. Cached.
    pub fn get_number_of_full_levels(&self) -> usize {
        *self.cache.full_levels.get_or_init(|| {
            let buckets = self.get_generation_node_dict();
            (0_u32..)
                .take_while(|generation| {
                    let expected = 1_usize.checked_shl(*generation);
                    expected.is_some() && expected == buckets.get(generation).map(Vec::len)
                })
                .count()
        })
    }

    /// Nodes with exactly `level` incident edges.
    ///
    /// "Level" here is node degree, not generation depth. Cached per
    /// distinct `level`.
    pub fn get_nodes_by_level(&self, level: usize) -> Vec<NodeId> {
        let mut memo = self
            .cache
            .by_degree
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        memo.entry(level)
            .or_insert_with(|| {
                self.nodes_with_ids()
                    .filter(|(_, node)| node.degree() == level)
                    .map(|(id, _)| id)
                    .collect()
            })
            .clone()
    }

    /// Concatenated buckets for generations `g1 - 1` up to but excluding
    /// `g2 - 1`.
    ///
    /// # Errors
    ///
    /// `GenerationNotFound` for the first generation in range that has no
    /// bucket.
    pub fn get_nodes_between_generations(
        &self,
        generation_one: i64,
        generation_two: i64,
    ) -> GraphResult<Vec<NodeId>> {
        let buckets = self.get_generation_node_dict();
        let mut nodes = Vec::new();
        for generation in generation_one.saturating_sub(1)..generation_two.saturating_sub(1) {
            let bucket = u32::try_from(generation)
                .ok()
                .and_then(|key| buckets.get(&key))
                .ok_or(GraphError::GenerationNotFound(generation))?;
            nodes.extend_from_slice(bucket);
        }
        Ok(nodes)
    }

    /// Tight per-axis extent covering every node, starting from the origin.
    #[must_use]
    pub fn get_shape(&self) -> Coords {
        self.nodes
            .iter()
            .fold(Coords::ORIGIN, |shape, node| shape.max(node.coords()))
            .extent()
    }

    /// Independent copy keeping topology and [`EdgeData`](crate::EdgeData)
    /// but with every attribute bag emptied.
    #[must_use]
    pub fn get_structure_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.attributes.clear();
        for node in &mut copy.nodes {
            node.clear_attributes();
        }
        for edge in &mut copy.edges {
            edge.clear_attributes();
        }
        copy
    }

    /// Fresh coordinate index over all nodes.
    #[must_use]
    pub fn get_coords_node_dict(&self) -> HashMap<Coords, NodeId> {
        self.nodes_with_ids()
            .map(|(id, node)| (node.coords(), id))
            .collect()
    }

    #[must_use]
    pub fn find_node(&self, coords: Coords) -> Option<NodeId> {
        self.nodes_with_ids()
            .find(|(_, node)| node.coords() == coords)
            .map(|(id, _)| id)
    }

    /// The stored edge joining the same node positions as `edge`, ignoring
    /// endpoint order.
    ///
    /// Endpoints are compared by coords, so nodes sharing a position are
    /// interchangeable here. `None` if an endpoint of `edge` is not in
    /// this graph.
    #[must_use]
    pub fn get_edge(&self, edge: &Edge) -> Option<EdgeId> {
        let wanted = self.endpoint_coords(edge)?;
        self.edges_with_ids()
            .find(|(_, stored)| self.endpoint_coords(stored) == Some(wanted))
            .map(|(id, _)| id)
    }

    fn endpoint_coords(&self, edge: &Edge) -> Option<(Coords, Coords)> {
        let a = self.node(edge.node_a())?.coords();
        let b = self.node(edge.node_b())?.coords();
        Some(if a <= b { (a, b) } else { (b, a) })
    }

    /// Edges whose attribute `name` equals `value`.
    ///
    /// Mirrored keys are read from edge data. Edges without the key never
    /// match. Integer and float values compare numerically.
    pub fn get_edges_by_parameter(&self, name: &str, value: &AttributeValue) -> Vec<EdgeId> {
        let matched: Vec<EdgeId> = self
            .edges_with_ids()
            .filter(|(_, edge)| edge.get(name).is_some_and(|stored| stored.matches(value)))
            .map(|(id, _)| id)
            .collect();
        debug!(parameter = name, count = matched.len(), "Number of filtered edges");
        matched
    }

    /// Numeric values of `name` across edges, in storage order.
    ///
    /// The first stored edge is the trunk leaving the root and is left out
    /// unless `include_first` is set. Edges without a numeric value are
    /// skipped.
    pub fn edge_parameter_values(&self, name: &str, include_first: bool) -> Vec<f64> {
        let skip = usize::from(!include_first);
        self.edges
            .iter()
            .skip(skip)
            .filter_map(|edge| edge.get(name).and_then(|value| value.as_f64()))
            .collect()
    }

    /// Nodes across each incident edge, in connection order.
    #[must_use]
    pub fn neighbours(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| {
                node.edges()
                    .iter()
                    .filter_map(|&edge_id| self.edge(edge_id))
                    .filter_map(|edge| edge.other_end(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remove the node at `coords`.
    ///
    /// A node that is not in the graph is logged and ignored.
    ///
    /// # Errors
    ///
    /// `UnsupportedRemoval` for nodes with more than two edges, checked
    /// before anything else. Removal of other nodes is not implemented yet
    /// and returns `NotImplemented`.
    pub fn remove_node(&mut self, coords: Coords) -> GraphResult<()> {
        let Some(id) = self.find_node(coords) else {
            warn!(%coords, "Node is not part of DAG, hence cannot be removed");
            return Ok(());
        };
        let degree = self.node(id).map_or(0, Node::degree);
        if degree > 2 {
            warn!(%coords, degree, "Node has too many edges hence cannot be removed");
            return Err(GraphError::UnsupportedRemoval { coords, degree });
        }
        Err(GraphError::not_implemented("removing nodes of degree 2 or less"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeData;

    // root(0) -> 1 -> 2, generations 1 and 2
    fn chain() -> GraphResult<Dag> {
        let mut nodes = vec![
            Node::new((0, 0, 0)),
            Node::new((0, 1, 0)),
            Node::new((0, 2, 3)),
        ];
        let edges = vec![
            Edge::with_data(
                NodeId::new(0),
                NodeId::new(1),
                EdgeData {
                    generation: 1,
                    ..EdgeData::default()
                },
            ),
            Edge::with_data(
                NodeId::new(1),
                NodeId::new(2),
                EdgeData {
                    generation: 2,
                    ..EdgeData::default()
                },
            ),
        ];
        nodes[0].add_edge(EdgeId::new(0));
        nodes[1].add_edge(EdgeId::new(0));
        nodes[1].add_edge(EdgeId::new(1));
        nodes[2].add_edge(EdgeId::new(1));
        Dag::new(NodeId::new(0), Coords::new(8, 8, 8), nodes, edges)
    }

    #[test]
    fn test_new_rejects_missing_root() {
        let result = Dag::new(NodeId::new(3), Coords::ORIGIN, vec![Node::new((0, 0, 0))], vec![]);
        assert_eq!(result.err(), Some(GraphError::RootMissing(NodeId::new(3))));
    }

    #[test]
    fn test_new_rejects_dangling_endpoint() {
        let edges = vec![Edge::new(NodeId::new(0), NodeId::new(5))];
        let result = Dag::new(NodeId::new(0), Coords::ORIGIN, vec![Node::new((0, 0, 0))], edges);
        assert!(matches!(result, Err(GraphError::NodeOutOfRange { .. })));
    }

    #[test]
    fn test_new_rejects_incidence_that_does_not_touch() {
        let mut nodes = vec![Node::new((0, 0, 0)), Node::new((1, 0, 0)), Node::new((2, 0, 0))];
        nodes[2].add_edge(EdgeId::new(0));
        let edges = vec![Edge::new(NodeId::new(0), NodeId::new(1))];
        let result = Dag::new(NodeId::new(0), Coords::ORIGIN, nodes, edges);
        assert!(matches!(result, Err(GraphError::DanglingIncidence { .. })));
    }

    #[test]
    fn test_bounded_walk_reports_but_does_not_expand() -> GraphResult<()> {
        let dag = chain()?;
        let mut reported = Vec::new();
        dag.traverse_from_root_bounded(
            crate::FnListener::new(|_, edge| reported.push(edge.id)),
            Some(1),
        );
        assert_eq!(reported, vec![EdgeId::new(0)]);
        Ok(())
    }

    #[test]
    fn test_lone_root_bucket() -> GraphResult<()> {
        let dag = Dag::new(NodeId::new(0), Coords::ORIGIN, vec![Node::new((1, 1, 1))], vec![])?;
        let buckets = dag.get_generation_node_dict();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get(&0), Some(&vec![NodeId::new(0)]));
        assert_eq!(dag.get_number_of_full_levels(), 1);
        Ok(())
    }

    #[test]
    fn test_chain_full_levels_stop_at_first_mismatch() -> GraphResult<()> {
        let dag = chain()?;
        // buckets: {0: [root], 1: [n1], 2: [n2]}; 2^1 != 1
        assert_eq!(dag.get_number_of_full_levels(), 1);
        Ok(())
    }

    #[test]
    fn test_edge_mut_invalidates_cache() -> GraphResult<()> {
        let mut dag = chain()?;
        assert_eq!(dag.get_generation_node_dict().len(), 3);
        assert_eq!(dag.traversal_count(), 1);

        if let Some(edge) = dag.edge_mut(EdgeId::new(1)) {
            edge.edge_data_mut().generation = 1;
        }

        assert_eq!(dag.get_generation_node_dict().len(), 2);
        assert_eq!(dag.traversal_count(), 2);
        Ok(())
    }

    #[test]
    fn test_range_with_negative_generation_fails() -> GraphResult<()> {
        let dag = chain()?;
        assert_eq!(
            dag.get_nodes_between_generations(0, 2),
            Err(GraphError::GenerationNotFound(-1))
        );
        Ok(())
    }

    #[test]
    fn test_neighbours() -> GraphResult<()> {
        let dag = chain()?;
        assert_eq!(dag.neighbours(NodeId::new(1)), vec![NodeId::new(0), NodeId::new(2)]);
        assert!(dag.neighbours(NodeId::new(42)).is_empty());
        Ok(())
    }

    #[test]
    fn test_get_edge_matches_duplicate_position() -> GraphResult<()> {
        let mut nodes = vec![
            Node::new((0, 0, 0)),
            Node::new((1, 0, 0)),
            Node::new((1, 0, 0)),
        ];
        nodes[0].add_edge(EdgeId::new(0));
        nodes[1].add_edge(EdgeId::new(0));
        let edges = vec![Edge::new(NodeId::new(0), NodeId::new(1))];
        let dag = Dag::new(NodeId::new(0), Coords::new(2, 1, 1), nodes, edges)?;

        let twin = Edge::new(NodeId::new(2), NodeId::new(0));

        assert_eq!(dag.nodes()[1], dag.nodes()[2]);
        assert_ne!(dag.edges()[0], twin);
        assert_eq!(dag.get_edge(&twin), Some(EdgeId::new(0)));
        assert_eq!(dag.get_edge(&Edge::new(NodeId::new(0), NodeId::new(9))), None);
        Ok(())
    }

    #[test]
    fn test_clone_starts_with_empty_caches() -> GraphResult<()> {
        let dag = chain()?;
        let _ = dag.get_generation_node_dict();
        let copy = dag.clone();
        assert_eq!(copy.traversal_count(), 0);
        assert_eq!(copy.get_generation_node_dict(), dag.get_generation_node_dict());
        Ok(())
    }

    #[test]
    fn test_edge_parameter_values_skip_trunk() -> GraphResult<()> {
        let mut dag = chain()?;
        if let Some(edge) = dag.edge_mut(EdgeId::new(0)) {
            edge.edge_data_mut().length = 10.0;
        }
        if let Some(edge) = dag.edge_mut(EdgeId::new(1)) {
            edge.edge_data_mut().length = 4.0;
        }
        assert_eq!(dag.edge_parameter_values("length", false), vec![4.0]);
        assert_eq!(dag.edge_parameter_values("length", true), vec![10.0, 4.0]);
        assert!(dag.edge_parameter_values("voxels", true).is_empty());
        Ok(())
    }
}
