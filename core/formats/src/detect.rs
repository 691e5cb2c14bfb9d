//! FILENAME: core/formats/src/detect.rs
//! PURPOSE: Format identity and extension-based detection.
//! CONTEXT: The extension table below is the single "format specification"
//! surface; detection, parser dispatch and serializer dispatch all go
//! through `FormatTag`, so the three cannot drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed identifier for a supported input/output file kind.
///
/// `Parquet` and `Arrow` are recognized for detection/selection but have no
/// working codec; `Sql` is export-only and has no detect mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Csv,
    Tsv,
    Json,
    Xlsx,
    Ods,
    Parquet,
    Sql,
    Xml,
    Html,
    Markdown,
    Arrow,
    Unknown,
}

impl FormatTag {
    /// Maps a file name to a format tag via the lowercase substring after
    /// the last `.`. Unmatched or missing extensions give `Unknown`.
    /// Pure, total, deterministic.
    pub fn from_file_name(name: &str) -> Self {
        let extension = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return FormatTag::Unknown,
        };
        match extension.as_str() {
            "csv" => FormatTag::Csv,
            "tsv" => FormatTag::Tsv,
            "json" => FormatTag::Json,
            "xlsx" => FormatTag::Xlsx,
            "ods" => FormatTag::Ods,
            "xml" => FormatTag::Xml,
            "html" | "htm" => FormatTag::Html,
            "md" => FormatTag::Markdown,
            "parquet" => FormatTag::Parquet,
            _ => FormatTag::Unknown,
        }
    }

    /// Canonical file extension for export file names.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatTag::Csv => "csv",
            FormatTag::Tsv => "tsv",
            FormatTag::Json => "json",
            FormatTag::Xlsx => "xlsx",
            FormatTag::Ods => "ods",
            FormatTag::Parquet => "parquet",
            FormatTag::Sql => "sql",
            FormatTag::Xml => "xml",
            FormatTag::Html => "html",
            FormatTag::Markdown => "md",
            FormatTag::Arrow => "arrow",
            FormatTag::Unknown => "",
        }
    }

    /// MIME type attached to export payloads.
    pub fn mime_type(&self) -> &'static str {
        match self {
            FormatTag::Csv => "text/csv",
            FormatTag::Tsv => "text/tab-separated-values",
            FormatTag::Json => "application/json",
            FormatTag::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            FormatTag::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            FormatTag::Parquet => "application/vnd.apache.parquet",
            FormatTag::Sql => "application/sql",
            FormatTag::Xml => "application/xml",
            FormatTag::Html => "text/html",
            FormatTag::Markdown => "text/markdown",
            FormatTag::Arrow => "application/vnd.apache.arrow.file",
            FormatTag::Unknown => "application/octet-stream",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatTag::Csv => "csv",
            FormatTag::Tsv => "tsv",
            FormatTag::Json => "json",
            FormatTag::Xlsx => "xlsx",
            FormatTag::Ods => "ods",
            FormatTag::Parquet => "parquet",
            FormatTag::Sql => "sql",
            FormatTag::Xml => "xml",
            FormatTag::Html => "html",
            FormatTag::Markdown => "markdown",
            FormatTag::Arrow => "arrow",
            FormatTag::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
