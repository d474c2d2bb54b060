//! Lazily loaded data of one case.

use std::sync::Arc;

use arbor_graph::Dag;

use crate::{CaseReader, DataStep, StoreResult};

/// Holds a case's annotated graph once it has been asked for.
#[derive(Debug)]
pub struct CaseData {
    reader: CaseReader,
    dag: Option<Arc<Dag>>,
}

impl CaseData {
    #[must_use]
    pub const fn new(reader: CaseReader) -> Self {
        Self { reader, dag: None }
    }

    #[must_use]
    pub const fn reader(&self) -> &CaseReader {
        &self.reader
    }

    /// The `dag_with_stats` graph, loaded on first call.
    ///
    /// # Errors
    ///
    /// Any failure from [`CaseReader::load`]; a failed load is retried on
    /// the next call.
    pub fn dag(&mut self) -> StoreResult<Arc<Dag>> {
        if let Some(dag) = &self.dag {
            return Ok(Arc::clone(dag));
        }
        let dag = self.reader.load(DataStep::DagWithStats)?;
        self.dag = Some(Arc::clone(&dag));
        Ok(dag)
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.dag.is_some()
    }
}
