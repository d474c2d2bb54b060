//! Timestamped CSV export of statistics rows.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use arbor_graph::{Dag, EdgeStatistics, GenerationSummary};
use chrono::Local;
use tracing::debug;

use crate::{StoreError, StoreResult};

const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M";

/// Writes numeric rows with three decimals, flushing after each row.
///
/// Empty cells stand for undefined values.
pub struct StatsWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl StatsWriter {
    /// Create `{results_dir}/{name}{YYYY_MM_DD_HH_MM}.csv` and write the
    /// header row.
    ///
    /// # Errors
    ///
    /// I/O or CSV failure creating the file.
    pub fn create(results_dir: &Path, name: &str, headers: &[&str]) -> StoreResult<Self> {
        fs::create_dir_all(results_dir).map_err(|e| StoreError::io(results_dir, &e))?;
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        Self::create_at(results_dir.join(format!("{name}{stamp}.csv")), headers)
    }

    /// Create the file at an exact path and write the header row.
    ///
    /// # Errors
    ///
    /// I/O or CSV failure creating the file.
    pub fn create_at(path: PathBuf, headers: &[&str]) -> StoreResult<Self> {
        let mut writer =
            csv::Writer::from_path(&path).map_err(|e| StoreError::csv(e.to_string()))?;
        writer
            .write_record(headers)
            .map_err(|e| StoreError::csv(e.to_string()))?;
        debug!(path = %path.display(), "CSV file created");
        Ok(Self { path, writer })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row.
    ///
    /// # Errors
    ///
    /// CSV or I/O failure writing the row.
    pub fn write_row(&mut self, values: &[Option<f64>]) -> StoreResult<()> {
        let cells = values
            .iter()
            .map(|value| value.map(|value| format!("{value:.3}")).unwrap_or_default());
        self.writer
            .write_record(cells)
            .map_err(|e| StoreError::csv(e.to_string()))?;
        self.writer
            .flush()
            .map_err(|e| StoreError::io(&self.path, &e))
    }
}

/// Export one row per edge of `dag`.
///
/// # Errors
///
/// Any [`StatsWriter`] failure.
pub fn write_edge_statistics(results_dir: &Path, name: &str, dag: &Dag) -> StoreResult<PathBuf> {
    let mut writer = StatsWriter::create(results_dir, name, &EdgeStatistics::HEADERS)?;
    for row in EdgeStatistics::from_dag(dag) {
        writer.write_row(&row.values())?;
    }
    Ok(writer.path().to_path_buf())
}

/// Export one summary row per generation of `dag`.
///
/// # Errors
///
/// Any [`StatsWriter`] failure.
pub fn write_generation_summary(results_dir: &Path, name: &str, dag: &Dag) -> StoreResult<PathBuf> {
    let mut writer = StatsWriter::create(results_dir, name, &GenerationSummary::HEADERS)?;
    for row in GenerationSummary::from_dag(dag) {
        writer.write_row(&row.values())?;
    }
    Ok(writer.path().to_path_buf())
}
