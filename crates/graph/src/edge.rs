//! Undirected skeleton branches and their mirrored attribute keys.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::{AttributeBag, AttributeValue, EdgeData, GraphError, GraphResult, NodeId};

/// Index of an edge inside the [`Dag`](crate::Dag) that owns it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EdgeId(usize);

impl EdgeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Attribute keys stored in [`EdgeData`] instead of the open bag.
struct MirroredField {
    key: &'static str,
    read: fn(&EdgeData) -> f64,
    write: fn(&mut EdgeData, f64),
}

static MIRRORED_FIELDS: [MirroredField; 3] = [
    MirroredField {
        key: "relative_angle",
        read: |data| data.relative_angle,
        write: |data, value| data.relative_angle = value,
    },
    MirroredField {
        key: "length",
        read: |data| data.length,
        write: |data, value| data.length = value,
    },
    MirroredField {
        key: "mean_thickness",
        read: |data| data.thickness,
        write: |data, value| data.thickness = value,
    },
];

fn mirrored(key: &str) -> Option<&'static MirroredField> {
    MIRRORED_FIELDS.iter().find(|field| field.key == key)
}

/// Keys whose reads and writes go through [`EdgeData`].
pub fn mirrored_keys() -> impl Iterator<Item = &'static str> {
    MIRRORED_FIELDS.iter().map(|field| field.key)
}

/// Connection between two skeleton nodes.
///
/// Equality and hashing ignore endpoint order. The stored order still
/// matters for traversal: `node_a` is the endpoint closer to the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    node_a: NodeId,
    node_b: NodeId,
    edge_data: EdgeData,
    attributes: AttributeBag,
}

impl Edge {
    #[must_use]
    pub fn new(node_a: NodeId, node_b: NodeId) -> Self {
        Self::with_data(node_a, node_b, EdgeData::default())
    }

    #[must_use]
    pub fn with_data(node_a: NodeId, node_b: NodeId, edge_data: EdgeData) -> Self {
        Self {
            node_a,
            node_b,
            edge_data,
            attributes: AttributeBag::new(),
        }
    }

    #[must_use]
    pub const fn node_a(&self) -> NodeId {
        self.node_a
    }

    #[must_use]
    pub const fn node_b(&self) -> NodeId {
        self.node_b
    }

    #[must_use]
    pub const fn endpoints(&self) -> (NodeId, NodeId) {
        (self.node_a, self.node_b)
    }

    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    #[must_use]
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.node_a {
            Some(self.node_b)
        } else if node == self.node_b {
            Some(self.node_a)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn edge_data(&self) -> &EdgeData {
        &self.edge_data
    }

    pub fn edge_data_mut(&mut self) -> &mut EdgeData {
        &mut self.edge_data
    }

    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.edge_data.generation
    }

    #[must_use]
    pub const fn is_same_generation(&self, other: &Self) -> bool {
        self.edge_data.generation == other.edge_data.generation
    }

    /// The open bag. Mirrored keys never live here.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    /// Write an attribute.
    ///
    /// `relative_angle`, `length` and `mean_thickness` are written to
    /// [`EdgeData`]; every other key goes to the open bag.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::AttributeType` when a mirrored key receives a
    /// non-numeric value.
    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) -> GraphResult<()> {
        let value = value.into();
        match mirrored(key) {
            Some(field) => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| GraphError::attribute_type(key, "number", value.type_name()))?;
                (field.write)(&mut self.edge_data, number);
            }
            None => {
                self.attributes.insert(key, value);
            }
        }
        Ok(())
    }

    /// Read an attribute, resolving mirrored keys from [`EdgeData`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Cow<'_, AttributeValue>> {
        match mirrored(key) {
            Some(field) => Some(Cow::Owned(AttributeValue::Float((field.read)(
                &self.edge_data,
            )))),
            None => self.attributes.get(key).map(Cow::Borrowed),
        }
    }

    /// Remove a bag attribute. Mirrored keys are structural and stay put.
    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        if mirrored(key).is_some() {
            return None;
        }
        self.attributes.remove(key)
    }

    pub(crate) fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    fn ordered_endpoints(&self) -> (NodeId, NodeId) {
        if self.node_a <= self.node_b {
            (self.node_a, self.node_b)
        } else {
            (self.node_b, self.node_a)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.ordered_endpoints() == other.ordered_endpoints()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered_endpoints().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn ids() -> (NodeId, NodeId) {
        (NodeId::new(0), NodeId::new(1))
    }

    #[test]
    fn test_equality_is_order_independent() {
        let (a, b) = ids();
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
        assert_eq!(hash_of(&Edge::new(a, b)), hash_of(&Edge::new(b, a)));
    }

    #[test]
    fn test_different_endpoints_differ() {
        let (a, b) = ids();
        assert_ne!(Edge::new(a, b), Edge::new(a, NodeId::new(2)));
    }

    #[test]
    fn test_mean_thickness_writes_edge_data() -> GraphResult<()> {
        let (a, b) = ids();
        let mut edge = Edge::new(a, b);

        edge.set("mean_thickness", 2.25)?;

        assert_eq!(edge.edge_data().thickness, 2.25);
        assert!(edge.attributes().get("mean_thickness").is_none());
        assert_eq!(
            edge.get("mean_thickness").map(Cow::into_owned),
            Some(AttributeValue::Float(2.25))
        );
        Ok(())
    }

    #[test]
    fn test_mirrored_reads_follow_direct_field_writes() {
        let (a, b) = ids();
        let mut edge = Edge::new(a, b);
        edge.edge_data_mut().length = 12.5;
        edge.edge_data_mut().relative_angle = 30.0;

        assert_eq!(edge.get("length").and_then(|v| v.as_f64()), Some(12.5));
        assert_eq!(edge.get("relative_angle").and_then(|v| v.as_f64()), Some(30.0));
    }

    #[test]
    fn test_integer_accepted_for_mirrored_key() -> GraphResult<()> {
        let (a, b) = ids();
        let mut edge = Edge::new(a, b);
        edge.set("length", 7_i64)?;
        assert_eq!(edge.edge_data().length, 7.0);
        Ok(())
    }

    #[test]
    fn test_unmirrored_keys_stay_in_bag() -> GraphResult<()> {
        let (a, b) = ids();
        let mut edge = Edge::new(a, b);

        edge.set("end_to_end_length", 9.0)?;
        edge.set("thickness", 4.0)?;

        assert_eq!(*edge.edge_data(), EdgeData::default());
        assert_eq!(edge.attributes().len(), 2);
        Ok(())
    }

    #[test]
    fn test_text_for_mirrored_key_is_type_error() {
        let (a, b) = ids();
        let mut edge = Edge::new(a, b);
        let result = edge.set("length", "long");
        assert!(matches!(result, Err(GraphError::AttributeType { .. })));
    }

    #[test]
    fn test_remove_ignores_mirrored_keys() -> GraphResult<()> {
        let (a, b) = ids();
        let mut edge = Edge::new(a, b);
        edge.set("length", 3.0)?;
        edge.set("voxels", Vec::<crate::Coords>::new())?;

        assert_eq!(edge.remove("length"), None);
        assert!(edge.remove("voxels").is_some());
        assert_eq!(edge.edge_data().length, 3.0);
        Ok(())
    }

    #[test]
    fn test_other_end() {
        let (a, b) = ids();
        let edge = Edge::new(a, b);
        assert_eq!(edge.other_end(a), Some(b));
        assert_eq!(edge.other_end(b), Some(a));
        assert_eq!(edge.other_end(NodeId::new(9)), None);
    }

    #[test]
    fn test_mirrored_keys_listed() {
        let keys: Vec<&str> = mirrored_keys().collect();
        assert_eq!(keys, vec!["relative_angle", "length", "mean_thickness"]);
    }
}
