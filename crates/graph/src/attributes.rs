//! Open attribute bags attached to nodes, edges and whole graphs.
//!
//! Derived per-entity metrics (`thickness`, `centroid`, `voxels`,
//! `start_direction`, ...) are stashed here without widening the entity
//! structs. Values are tagged so a bag round-trips through the store codec
//! exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Coords;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Coords(Coords),
    /// Direction or centroid in continuous space.
    Vector([f64; 3]),
    /// Voxel set, e.g. the skeleton voxels an edge was traced through.
    Voxels(Vec<Coords>),
    Floats(Vec<f64>),
}

impl AttributeValue {
    /// Name of the variant, used in type errors.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Coords(_) => "coords",
            Self::Vector(_) => "vector",
            Self::Voxels(_) => "voxels",
            Self::Floats(_) => "floats",
        }
    }

    /// Numeric view of `Int` and `Float` values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_voxels(&self) -> Option<&[Coords]> {
        match self {
            Self::Voxels(voxels) => Some(voxels),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_vector(&self) -> Option<[f64; 3]> {
        match self {
            Self::Vector(vector) => Some(*vector),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Equality that treats `Int` and `Float` as the same numeric domain.
    ///
    /// Mirrored edge fields always read back as `Float`, so filters written
    /// with integer literals still match them.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Coords> for AttributeValue {
    fn from(value: Coords) -> Self {
        Self::Coords(value)
    }
}

impl From<[f64; 3]> for AttributeValue {
    fn from(value: [f64; 3]) -> Self {
        Self::Vector(value)
    }
}

impl From<Vec<Coords>> for AttributeValue {
    fn from(value: Vec<Coords>) -> Self {
        Self::Voxels(value)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Floats(value)
    }
}

/// String-keyed attribute map with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(BTreeMap<String, AttributeValue>);

impl AttributeBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
