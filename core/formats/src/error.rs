//! FILENAME: core/formats/src/error.rs

use crate::detect::FormatTag;
use thiserror::Error;

/// Failure taxonomy for parsing and serialization. Every parser and
/// serializer resolves to one of these; none of them panic.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Extension not recognized, or recognized but unimplemented
    /// (Parquet/Arrow, and SQL on the parse side).
    #[error("unsupported format: {0}")]
    Unsupported(FormatTag),

    /// Structurally invalid input for the detected format.
    #[error("malformed content: {0}")]
    Malformed(String),

    /// Parse succeeded syntactically but yielded zero rows or columns.
    /// Recoverable: shown to the user as "no data", not a fatal fault.
    #[error("no data: the input produced an empty table")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("ODS read error: {0}")]
    OdsRead(#[from] calamine::OdsError),
}
