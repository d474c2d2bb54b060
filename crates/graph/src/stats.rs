//! Per-edge measurement rows and per-generation summaries.

use itertools::Itertools;
use serde::Serialize;

use crate::{Dag, EdgeId};

/// Measurements of one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStatistics {
    pub edge: EdgeId,
    pub generation: u32,
    pub length: f64,
    pub thickness: f64,
    pub relative_angle: f64,
    pub end_to_end_length: f64,
    /// Path length over chord length; undefined for a zero chord.
    pub tortuosity: Option<f64>,
}

impl EdgeStatistics {
    pub const HEADERS: [&'static str; 7] = [
        "edge",
        "generation",
        "length",
        "thickness",
        "relative_angle",
        "end_to_end_length",
        "tortuosity",
    ];

    /// One row per edge, in storage order.
    #[must_use]
    pub fn from_dag(dag: &Dag) -> Vec<Self> {
        dag.edges_with_ids()
            .map(|(id, edge)| {
                let data = edge.edge_data();
                let tortuosity = (data.end_to_end_length > 0.0)
                    .then(|| data.length / data.end_to_end_length);
                Self {
                    edge: id,
                    generation: data.generation,
                    length: data.length,
                    thickness: data.thickness,
                    relative_angle: data.relative_angle,
                    end_to_end_length: data.end_to_end_length,
                    tortuosity,
                }
            })
            .collect()
    }

    /// Row cells matching [`EdgeStatistics::HEADERS`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> [Option<f64>; 7] {
        [
            Some(self.edge.index() as f64),
            Some(f64::from(self.generation)),
            Some(self.length),
            Some(self.thickness),
            Some(self.relative_angle),
            Some(self.end_to_end_length),
            self.tortuosity,
        ]
    }
}

/// Means over all edges of one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub edge_count: usize,
    pub mean_length: f64,
    pub mean_thickness: f64,
    pub mean_relative_angle: f64,
}

impl GenerationSummary {
    pub const HEADERS: [&'static str; 5] = [
        "generation",
        "edge_count",
        "mean_length",
        "mean_thickness",
        "mean_relative_angle",
    ];

    /// One summary per generation present on any edge, ascending.
    #[must_use]
    pub fn from_dag(dag: &Dag) -> Vec<Self> {
        dag.edges()
            .iter()
            .map(|edge| *edge.edge_data())
            .into_group_map_by(|data| data.generation)
            .into_iter()
            .sorted_by_key(|(generation, _)| *generation)
            .map(|(generation, group)| Self {
                generation,
                edge_count: group.len(),
                mean_length: mean(group.iter().map(|data| data.length)),
                mean_thickness: mean(group.iter().map(|data| data.thickness)),
                mean_relative_angle: mean(group.iter().map(|data| data.relative_angle)),
            })
            .collect()
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> [Option<f64>; 5] {
        [
            Some(f64::from(self.generation)),
            Some(self.edge_count as f64),
            Some(self.mean_length),
            Some(self.mean_thickness),
            Some(self.mean_relative_angle),
        ]
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), value| {
        (sum + value, count.saturating_add(1))
    });
    if count == 0 { 0.0 } else { sum / count as f64 }
}
