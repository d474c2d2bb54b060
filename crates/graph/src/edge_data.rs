//! Per-branch measurements carried on every edge.

use serde::{Deserialize, Serialize};

/// Scalar measurements of one skeleton branch.
///
/// Structural: survives [`Dag::get_structure_copy`](crate::Dag::get_structure_copy),
/// unlike the attribute bags.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeData {
    /// Branching angle relative to the parent branch, in degrees.
    pub relative_angle: f64,
    /// Length along the traced skeleton path.
    pub length: f64,
    /// Mean radius along the branch.
    pub thickness: f64,
    /// Branch rank counted from the root, assigned by the analysis stage.
    pub generation: u32,
    /// Straight-line distance between the endpoints.
    pub end_to_end_length: f64,
}
