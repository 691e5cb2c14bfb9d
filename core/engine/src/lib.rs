//! FILENAME: core/engine/src/lib.rs
//! FastData Canonical Data Model
//!
//! The format-independent row/column representation that every parser
//! produces and every serializer consumes, plus the scalar type-coercion
//! rules shared by all text-based formats.

pub mod table;
pub mod value;

pub use table::{Row, Table};
pub use value::{coerce, Scalar};
