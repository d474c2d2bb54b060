//! Integer voxel coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer position of a voxel in scan space.
///
/// Also used for extents: [`Dag::get_shape`](crate::Dag::get_shape) returns the
/// per-axis size needed to hold every node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coords {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Coords {
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// Extent of a grid whose largest index is `self` on every axis.
    #[must_use]
    pub const fn extent(self) -> Self {
        Self {
            x: self.x.saturating_add(1),
            y: self.y.saturating_add(1),
            z: self.z.saturating_add(1),
        }
    }

    #[must_use]
    pub const fn as_array(self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<(i64, i64, i64)> for Coords {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[i64; 3]> for Coords {
    fn from([x, y, z]: [i64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
