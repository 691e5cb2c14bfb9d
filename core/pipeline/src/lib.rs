//! FILENAME: core/pipeline/src/lib.rs
//! FastData Pipeline Module
//!
//! Owns the single live pipeline state: the current file, the canonical
//! preview/transformed tables, the load status and the editable transform
//! query. Parsers and serializers are stateless; all mutation funnels
//! through the `PipelineStore` transition methods.
//!
//! Layers:
//! - `state`: the state value and its transition methods (load lifecycle)
//! - `transform`: the query-stage seam and its default implementation

pub mod state;
pub mod transform;

pub use state::{LoadStatus, LoadTicket, PipelineState, PipelineStore, SourceFile, DEFAULT_QUERY};
pub use transform::{PassthroughEngine, TransformEngine, TransformError};
