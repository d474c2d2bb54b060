//! CLI command handlers.
//!
//! Each handler resolves the selected cases through [`CaseReader`], loads
//! their annotated graphs and reports on them. A case that fails to load is
//! logged and skipped so one broken directory does not stop a batch.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arbor_core::{Config, ResultExt};
use arbor_graph::Dag;
use arbor_store::{CaseData, CaseReader, write_edge_statistics, write_generation_summary};
use serde::Serialize;
use tracing::info;

use crate::cli::{CaseSelection, Commands};

/// Execute a CLI command.
///
/// This is the main command dispatcher that routes to the appropriate handler.
///
/// # Errors
///
/// Fails when the case directories cannot be listed or an export cannot be
/// written.
pub fn execute_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Shape { selection } => cmd_shape(&selection, config),
        Commands::Summary { selection, json } => cmd_summary(&selection, json, config),
        Commands::Stats {
            selection,
            name,
            per_generation,
        } => cmd_stats(&selection, name.as_deref(), per_generation, config).map(|_| ()),
    }
}

/// Generation overview of one case graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSummary {
    pub case: String,
    pub nodes: usize,
    pub edges: usize,
    pub shape: [i64; 3],
    /// Node count per generation bucket.
    pub generations: BTreeMap<u32, usize>,
    pub full_levels: usize,
}

impl CaseSummary {
    #[must_use]
    pub fn of(case: &str, dag: &Dag) -> Self {
        Self {
            case: case.to_string(),
            nodes: dag.node_count(),
            edges: dag.edge_count(),
            shape: dag.get_shape().as_array(),
            generations: dag
                .get_generation_node_dict()
                .iter()
                .map(|(&generation, nodes)| (generation, nodes.len()))
                .collect(),
            full_levels: dag.get_number_of_full_levels(),
        }
    }
}

/// Readers for the selected kind, narrowed to the requested names.
fn select_cases(selection: &CaseSelection, config: &Config) -> Result<Vec<CaseData>> {
    let names = CaseReader::filter_cases(config, selection.kind.into())
        .with_context(|| format!("Cannot list cases in {}", config.data_dir.display()))?;
    let keep = (!selection.cases.is_empty()).then_some(selection.cases.as_slice());
    let cases: Vec<CaseData> = CaseReader::readers_for(&names, keep, config)
        .into_iter()
        .map(CaseData::new)
        .collect();
    info!(selected = cases.len(), "Cases selected");
    Ok(cases)
}

fn cmd_shape(selection: &CaseSelection, config: &Config) -> Result<()> {
    for mut case in select_cases(selection, config)? {
        if let Ok(dag) = case.dag().warn_on_err("Skipping case") {
            info!(case = %case.reader(), shape = %dag.get_shape(), "Graph shape");
        }
    }
    Ok(())
}

fn cmd_summary(selection: &CaseSelection, json: bool, config: &Config) -> Result<()> {
    let summaries: Vec<CaseSummary> = select_cases(selection, config)?
        .into_iter()
        .filter_map(|mut case| {
            let dag = case.dag().warn_on_err("Skipping case").ok()?;
            Some(CaseSummary::of(case.reader().tree_name(), &dag))
        })
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("Cannot encode summary")?
        );
    } else {
        for summary in &summaries {
            println!(
                "{}: {} nodes, {} edges, shape {:?}, full levels {}",
                summary.case, summary.nodes, summary.edges, summary.shape, summary.full_levels
            );
            for (generation, count) in &summary.generations {
                println!("  generation {generation}: {count} nodes");
            }
        }
    }
    Ok(())
}

/// Write one CSV per selected case, returning the written paths.
///
/// # Errors
///
/// Fails when a CSV file cannot be written.
pub fn cmd_stats(
    selection: &CaseSelection,
    name: Option<&str>,
    per_generation: bool,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for mut case in select_cases(selection, config)? {
        let Ok(dag) = case.dag().warn_on_err("Skipping case") else {
            continue;
        };
        let case_name = case.reader().tree_name().to_string();
        let prefix = match name {
            Some(name) => format!("{name}_{case_name}_"),
            None => format!("{case_name}_"),
        };
        let path = if per_generation {
            write_generation_summary(&config.results_dir, &prefix, &dag)
        } else {
            write_edge_statistics(&config.results_dir, &prefix, &dag)
        }
        .with_context(|| format!("Cannot export statistics for {case_name}"))?;
        info!(case = %case_name, path = %path.display(), "Statistics written");
        written.push(path);
    }
    Ok(written)
}
