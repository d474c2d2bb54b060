//! Dense voxel painting for export and rendering consumers.

use tracing::debug;

use crate::{AttributeValue, Coords, Dag, GraphError, GraphResult};

/// Edge attribute holding the skeleton voxels an edge was traced through.
pub const VOXELS_KEY: &str = "voxels";

/// Dense `f64` volume indexed by voxel coordinates, `x` fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    shape: Coords,
    values: Vec<f64>,
}

impl VoxelGrid {
    /// Zero-filled grid. Negative extents are treated as empty.
    ///
    /// # Errors
    ///
    /// `GridTooLarge` if the voxel count overflows or cannot be allocated.
    pub fn zeros(shape: Coords) -> GraphResult<Self> {
        let len = [shape.x, shape.y, shape.z]
            .into_iter()
            .map(|axis| usize::try_from(axis).unwrap_or(0))
            .try_fold(1_usize, usize::checked_mul)
            .ok_or(GraphError::GridTooLarge(shape))?;
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|_| GraphError::GridTooLarge(shape))?;
        values.resize(len, 0.0);
        Ok(Self { shape, values })
    }

    /// Grid of extent [`Dag::get_shape`] with each edge's `voxels` painted
    /// with that edge's numeric value for `key`.
    ///
    /// Edges missing either attribute are skipped.
    ///
    /// # Errors
    ///
    /// `GridTooLarge` when the graph extent cannot be held in memory.
    pub fn from_edges(dag: &Dag, key: &str) -> GraphResult<Self> {
        let mut grid = Self::zeros(dag.get_shape())?;
        for (id, edge) in dag.edges_with_ids() {
            let value = edge.get(key).and_then(|value| value.as_f64());
            let voxels = edge.attributes().get(VOXELS_KEY).and_then(AttributeValue::as_voxels);
            let (Some(value), Some(voxels)) = (value, voxels) else {
                debug!(edge = %id, key, "Edge has nothing to paint");
                continue;
            };
            for &voxel in voxels {
                grid.set(voxel, value);
            }
        }
        Ok(grid)
    }

    /// Mark every node position with `value`.
    pub fn paint_nodes(&mut self, dag: &Dag, value: f64) {
        for node in dag.nodes() {
            self.set(node.coords(), value);
        }
    }

    #[must_use]
    pub const fn shape(&self) -> Coords {
        self.shape
    }

    #[must_use]
    pub fn get(&self, coords: Coords) -> Option<f64> {
        self.offset(coords).and_then(|offset| self.values.get(offset).copied())
    }

    /// Write one voxel. Returns `false` if `coords` lies outside the grid.
    pub fn set(&mut self, coords: Coords, value: f64) -> bool {
        let slot = self
            .offset(coords)
            .and_then(|offset| self.values.get_mut(offset));
        match slot {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                debug!(%coords, shape = %self.shape, "Voxel outside grid skipped");
                false
            }
        }
    }

    #[must_use]
    pub fn count_nonzero(&self) -> usize {
        self.values.iter().filter(|value| **value != 0.0).count()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn offset(&self, coords: Coords) -> Option<usize> {
        let axis = |value: i64, extent: i64| -> Option<usize> {
            (0..extent)
                .contains(&value)
                .then(|| usize::try_from(value).ok())
                .flatten()
        };
        let x = axis(coords.x, self.shape.x)?;
        let y = axis(coords.y, self.shape.y)?;
        let z = axis(coords.z, self.shape.z)?;
        let width = usize::try_from(self.shape.x).ok()?;
        let height = usize::try_from(self.shape.y).ok()?;
        z.checked_mul(height)?
            .checked_add(y)?
            .checked_mul(width)?
            .checked_add(x)
    }
}
