//! Per-case data directories.
//!
//! Every case lives in `{data_dir}/{tree_name}/`, and each processing step
//! writes one file there named after the step plus the configured size
//! suffix, e.g. `P01/dag_with_stats_512.arbor`. The first letter of the case
//! directory tells what kind of tree it holds.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use arbor_core::Config;
use arbor_graph::Dag;
use tracing::{debug, instrument, warn};

use crate::{StoreError, StoreResult, codec};

/// File extension of graph blobs.
pub const DAG_EXTENSION: &str = "arbor";

/// Graph-producing processing steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataStep {
    /// Skeleton graph as extracted.
    Dag,
    /// Skeleton graph annotated with edge statistics.
    DagWithStats,
}

impl DataStep {
    pub const ALL: [Self; 2] = [Self::Dag, Self::DagWithStats];

    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Dag => "dag",
            Self::DagWithStats => "dag_with_stats",
        }
    }

    /// File name for this step with `size_suffix` appended to the stem.
    #[must_use]
    pub fn file_name(self, size_suffix: &str) -> String {
        format!("{}{size_suffix}.{DAG_EXTENSION}", self.stem())
    }
}

impl fmt::Display for DataStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// Case kinds, keyed by the first letter of the case directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    Generated,
    Model,
    Specimen,
}

impl CaseKind {
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Generated => 'G',
            Self::Model => 'M',
            Self::Specimen => 'P',
        }
    }

    #[must_use]
    pub fn of_case(name: &str) -> Option<Self> {
        match name.chars().next()? {
            'G' => Some(Self::Generated),
            'M' => Some(Self::Model),
            'P' => Some(Self::Specimen),
            _ => None,
        }
    }
}

/// Reads and writes the data files of one case.
#[derive(Debug)]
pub struct CaseReader {
    tree_name: String,
    config: Config,
    cache: HashMap<DataStep, Arc<Dag>>,
}

impl CaseReader {
    #[must_use]
    pub fn new(tree_name: impl Into<String>, config: Config) -> Self {
        Self {
            tree_name: tree_name.into(),
            config,
            cache: HashMap::new(),
        }
    }

    #[must_use]
    pub fn tree_name(&self) -> &str {
        &self.tree_name
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_force_override(&mut self, force_override: bool) {
        self.config.force_override = force_override;
    }

    #[must_use]
    pub fn case_dir(&self) -> PathBuf {
        self.config.data_dir.join(&self.tree_name)
    }

    #[must_use]
    pub fn full_name(&self, step: DataStep) -> PathBuf {
        self.case_dir()
            .join(step.file_name(&self.config.size_suffix()))
    }

    #[must_use]
    pub fn datafile_exists(&self, step: DataStep) -> bool {
        self.full_name(step).exists()
    }

    /// Save `dag` as the output of `step`, creating the case directory.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the file exists and overriding is off, or any
    /// I/O or encoding failure.
    pub fn save(&mut self, step: DataStep, dag: &Dag) -> StoreResult<PathBuf> {
        let dir = self.case_dir();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, &e))?;
        let path = self.full_name(step);
        codec::save_dag(&path, dag, self.config.force_override)?;
        self.cache.remove(&step);
        Ok(path)
    }

    /// Load the output of `step`, from the cache when enabled.
    ///
    /// # Errors
    ///
    /// `NotFound` if the data file is missing, or any decoding failure.
    #[instrument(skip(self), fields(case = %self.tree_name))]
    pub fn load(&mut self, step: DataStep) -> StoreResult<Arc<Dag>> {
        if let Some(cached) = self.cache.get(&step) {
            debug!("Served from cache");
            return Ok(Arc::clone(cached));
        }

        let path = self.full_name(step);
        let dag = arbor_core::logging::timed("load_dag", || codec::load_dag(&path))
            .inspect_err(|e| warn!(path = %path.display(), error = %e, "Loading data file failed"))?;
        let dag = Arc::new(dag);
        if self.config.use_cache {
            self.cache.insert(step, Arc::clone(&dag));
        }
        Ok(dag)
    }

    /// Every case directory under `config.data_dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// I/O failure reading the data directory.
    pub fn list_cases(config: &Config) -> StoreResult<Vec<String>> {
        let dir = &config.data_dir;
        let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, &e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir, &e))?;
            let name = entry.file_name().to_str().map(str::to_string);
            match name {
                Some(name) if entry.path().is_dir() => names.push(name),
                _ => {}
            }
        }
        names.sort();
        Ok(names)
    }

    /// Case directories of one kind.
    ///
    /// # Errors
    ///
    /// See [`CaseReader::list_cases`].
    pub fn filter_cases(config: &Config, kind: CaseKind) -> StoreResult<Vec<String>> {
        Ok(Self::list_cases(config)?
            .into_iter()
            .filter(|name| CaseKind::of_case(name) == Some(kind))
            .collect())
    }

    /// One reader per name, optionally restricted to `keep`.
    #[must_use]
    pub fn readers_for(names: &[String], keep: Option<&[String]>, config: &Config) -> Vec<Self> {
        names
            .iter()
            .filter(|name| keep.is_none_or(|keep| keep.contains(*name)))
            .map(|name| Self::new(name.clone(), config.clone()))
            .collect()
    }
}

impl fmt::Display for CaseReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tree_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_with_and_without_size() {
        assert_eq!(DataStep::Dag.file_name(""), "dag.arbor");
        assert_eq!(DataStep::DagWithStats.file_name("_512"), "dag_with_stats_512.arbor");
    }

    #[test]
    fn test_full_name_uses_configured_size() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            default_size: Some(256),
            ..Config::default()
        };
        let reader = CaseReader::new("P01", config);

        assert_eq!(
            reader.full_name(DataStep::Dag),
            PathBuf::from("/data/P01/dag_256.arbor")
        );
    }

    #[test]
    fn test_case_kind_from_prefix() {
        assert_eq!(CaseKind::of_case("P07"), Some(CaseKind::Specimen));
        assert_eq!(CaseKind::of_case("G1"), Some(CaseKind::Generated));
        assert_eq!(CaseKind::of_case("x"), None);
        assert_eq!(CaseKind::of_case(""), None);
        assert_eq!(CaseKind::Model.prefix(), 'M');
    }

    #[test]
    fn test_readers_for_keeps_requested() {
        let names = vec!["P01".to_string(), "P02".to_string(), "P03".to_string()];
        let keep = vec!["P01".to_string(), "P03".to_string()];

        let readers = CaseReader::readers_for(&names, Some(keep.as_slice()), &Config::default());
        let kept: Vec<&str> = readers.iter().map(CaseReader::tree_name).collect();

        assert_eq!(kept, vec!["P01", "P03"]);
        assert_eq!(CaseReader::readers_for(&names, None, &Config::default()).len(), 3);
    }
}
