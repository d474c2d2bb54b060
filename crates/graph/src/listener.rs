//! Traversal listeners.
//!
//! [`Dag::traverse_from_root`](crate::Dag::traverse_from_root) is the single
//! walking primitive; every generation query is built by handing it a
//! listener. The built-in listeners here cover bucketing, counting and
//! filtering, and [`FnListener`] adapts a closure for one-off walks.

use std::collections::BTreeMap;
use std::ops::Deref;

use crate::{Edge, EdgeId, NodeId};

/// A borrowed edge together with its handle in the owning graph.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub id: EdgeId,
    pub edge: &'a Edge,
}

impl<'a> EdgeView<'a> {
    #[must_use]
    pub const fn new(id: EdgeId, edge: &'a Edge) -> Self {
        Self { id, edge }
    }
}

impl Deref for EdgeView<'_> {
    type Target = Edge;

    fn deref(&self) -> &Edge {
        self.edge
    }
}

/// Callback invoked once per edge reported by a root-anchored walk.
pub trait TraverseListener {
    /// `parent` is the edge through which the walk reached the edge's
    /// `node_a`, or `None` for edges leaving the root.
    fn on_edge_traversed(&mut self, parent: Option<EdgeView<'_>>, edge: EdgeView<'_>);
}

impl<L: TraverseListener + ?Sized> TraverseListener for &mut L {
    fn on_edge_traversed(&mut self, parent: Option<EdgeView<'_>>, edge: EdgeView<'_>) {
        (**self).on_edge_traversed(parent, edge);
    }
}

/// Buckets reached nodes by edge generation.
///
/// The first edge seen without a parent seeds bucket 0 with its `node_a`,
/// which is the root. Every reported edge then files the node it reaches
/// under its own generation.
#[derive(Debug, Default)]
pub struct GenerationCollector {
    buckets: BTreeMap<u32, Vec<NodeId>>,
    root_seen: bool,
}

impl GenerationCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn into_buckets(self) -> BTreeMap<u32, Vec<NodeId>> {
        self.buckets
    }
}

impl TraverseListener for GenerationCollector {
    fn on_edge_traversed(&mut self, parent: Option<EdgeView<'_>>, edge: EdgeView<'_>) {
        if parent.is_none() && !self.root_seen {
            self.buckets.entry(0).or_default().push(edge.node_a());
            self.root_seen = true;
        }
        self.buckets
            .entry(edge.generation())
            .or_default()
            .push(edge.node_b());
    }
}

/// Counts reported edges, overall and per generation.
#[derive(Debug, Default)]
pub struct CountingListener {
    total: usize,
    per_generation: BTreeMap<u32, usize>,
}

impl CountingListener {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn count_for(&self, generation: u32) -> usize {
        self.per_generation.get(&generation).copied().unwrap_or(0)
    }

    #[must_use]
    pub const fn per_generation(&self) -> &BTreeMap<u32, usize> {
        &self.per_generation
    }
}

impl TraverseListener for CountingListener {
    fn on_edge_traversed(&mut self, _parent: Option<EdgeView<'_>>, edge: EdgeView<'_>) {
        self.total = self.total.saturating_add(1);
        let count = self.per_generation.entry(edge.generation()).or_insert(0);
        *count = count.saturating_add(1);
    }
}

/// Collects the handles of reported edges accepted by a predicate,
/// in traversal order.
pub struct EdgeFilter<P> {
    predicate: P,
    matched: Vec<EdgeId>,
}

impl<P: FnMut(&Edge) -> bool> EdgeFilter<P> {
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            matched: Vec::new(),
        }
    }

    #[must_use]
    pub fn matched(&self) -> &[EdgeId] {
        &self.matched
    }

    #[must_use]
    pub fn into_matched(self) -> Vec<EdgeId> {
        self.matched
    }
}

impl<P: FnMut(&Edge) -> bool> TraverseListener for EdgeFilter<P> {
    fn on_edge_traversed(&mut self, _parent: Option<EdgeView<'_>>, edge: EdgeView<'_>) {
        if (self.predicate)(edge.edge) {
            self.matched.push(edge.id);
        }
    }
}

/// Adapts a closure into a listener.
pub struct FnListener<F>(F);

impl<F> FnListener<F>
where
    F: FnMut(Option<EdgeView<'_>>, EdgeView<'_>),
{
    pub const fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> TraverseListener for FnListener<F>
where
    F: FnMut(Option<EdgeView<'_>>, EdgeView<'_>),
{
    fn on_edge_traversed(&mut self, parent: Option<EdgeView<'_>>, edge: EdgeView<'_>) {
        (self.0)(parent, edge);
    }
}
