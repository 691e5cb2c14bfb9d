//! FILENAME: core/pipeline/src/transform.rs
//! PURPOSE: The transform-stage seam between the pipeline and a query
//! engine.
//! CONTEXT: The original product shipped a "run SQL" action that faked its
//! results; here the stage is an honest extension point instead. Queries
//! always run against the preview table, never mutate their input, and are
//! required to be idempotent (same query + same input => same output). A
//! real filter/project/aggregate engine plugs in by implementing
//! `TransformEngine`.

use crate::state::{LoadStatus, PipelineStore};
use engine::Table;
use log::warn;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("transform query is empty")]
    EmptyQuery,

    #[error("no table is loaded")]
    NoInput,

    #[error("transform failed: {0}")]
    Query(String),
}

/// A query stage: derives a new table from an input table. Implementations
/// must not mutate the input and must be deterministic for a given
/// (query, table) pair.
pub trait TransformEngine {
    fn apply(&self, query: &str, table: &Table) -> Result<Table, TransformError>;
}

/// Default stage: validates the query is present and returns the input
/// unchanged. Stands in until a real query engine is attached.
pub struct PassthroughEngine;

impl TransformEngine for PassthroughEngine {
    fn apply(&self, query: &str, table: &Table) -> Result<Table, TransformError> {
        if query.trim().is_empty() {
            return Err(TransformError::EmptyQuery);
        }
        Ok(table.clone())
    }
}

impl PipelineStore {
    /// Runs the stored query against the preview table and publishes the
    /// result. On failure the error surfaces through the `Error` status and
    /// message; `preview` and `transformed` are left untouched.
    pub fn run_transform(&mut self, engine: &dyn TransformEngine) -> Result<(), TransformError> {
        if self.state().status == LoadStatus::Idle {
            return Err(TransformError::NoInput);
        }
        let query = self.state().query.clone();
        let result = engine.apply(&query, &self.state().preview);
        match result {
            Ok(table) => {
                self.set_transformed(table);
                Ok(())
            }
            Err(e) => {
                warn!("transform failed: {}", e);
                self.record_transform_failure(e.to_string());
                Err(e)
            }
        }
    }
}
