//! FILENAME: core/formats/src/lib.rs
//! FastData Formats Module
//!
//! Format detection, parsers and serializers for the canonical table
//! model. Raw bytes come in through `ingest`, a `Table` goes out through
//! `export_table`; both dispatch on `FormatTag` so the set of recognized
//! formats lives in exactly one place.

mod delimited;
mod detect;
mod error;
mod html;
mod json;
mod markdown;
mod sheet;
mod sql;
mod xml;

pub use delimited::PREVIEW_ROW_CAP;
pub use detect::FormatTag;
pub use error::FormatError;
pub use sheet::{SheetCodec, WorkbookCodec};

use engine::Table;
use log::{debug, warn};

/// A serialized table ready to hand to a download/save collaborator.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: String,
}

/// Parses raw file content into a canonical table, picking the parser from
/// the file name's extension. Uses the default workbook codec for binary
/// spreadsheet formats.
pub fn ingest(file_name: &str, raw: &[u8]) -> Result<Table, FormatError> {
    ingest_with_codec(file_name, raw, &WorkbookCodec)
}

/// Like `ingest`, with an injected spreadsheet codec.
pub fn ingest_with_codec(
    file_name: &str,
    raw: &[u8],
    codec: &dyn SheetCodec,
) -> Result<Table, FormatError> {
    let tag = FormatTag::from_file_name(file_name);
    debug!("ingesting {} ({} bytes) as {}", file_name, raw.len(), tag);
    let result = match tag {
        FormatTag::Csv => delimited::parse_delimited(text(raw)?, b','),
        FormatTag::Tsv => delimited::parse_delimited(text(raw)?, b'\t'),
        FormatTag::Json => json::parse_json(text(raw)?),
        FormatTag::Xlsx | FormatTag::Ods => sheet::parse_sheet(raw, tag, codec),
        FormatTag::Xml => xml::parse_xml(text(raw)?),
        FormatTag::Html => html::parse_html(text(raw)?),
        FormatTag::Markdown => markdown::parse_markdown(text(raw)?),
        FormatTag::Parquet | FormatTag::Arrow | FormatTag::Sql | FormatTag::Unknown => {
            Err(FormatError::Unsupported(tag))
        }
    };
    if let Err(e) = &result {
        warn!("ingest of {} failed: {}", file_name, e);
    }
    result
}

/// Serializes a table into the requested format. The export file name is
/// `{base_name}.{extension}`. Uses the default workbook codec for XLSX.
pub fn export_table(
    tag: FormatTag,
    table: &Table,
    base_name: &str,
) -> Result<ExportPayload, FormatError> {
    export_table_with_codec(tag, table, base_name, &WorkbookCodec)
}

/// Like `export_table`, with an injected spreadsheet codec.
pub fn export_table_with_codec(
    tag: FormatTag,
    table: &Table,
    base_name: &str,
    codec: &dyn SheetCodec,
) -> Result<ExportPayload, FormatError> {
    debug!("exporting {} rows as {}", table.row_count(), tag);
    let bytes = match tag {
        FormatTag::Csv => delimited::write_delimited(table, b',')?,
        FormatTag::Tsv => delimited::write_delimited(table, b'\t')?,
        FormatTag::Json => json::write_json(table)?,
        FormatTag::Xlsx => codec.encode(table, base_name)?,
        FormatTag::Sql => sql::write_sql(table, base_name)?,
        FormatTag::Xml => xml::write_xml(table)?,
        FormatTag::Markdown => markdown::write_markdown(table)?,
        FormatTag::Ods
        | FormatTag::Parquet
        | FormatTag::Arrow
        | FormatTag::Html
        | FormatTag::Unknown => return Err(FormatError::Unsupported(tag)),
    };
    Ok(ExportPayload {
        bytes,
        mime_type: tag.mime_type(),
        file_name: format!("{}.{}", base_name, tag.extension()),
    })
}

fn text(raw: &[u8]) -> Result<&str, FormatError> {
    std::str::from_utf8(raw)
        .map_err(|e| FormatError::Malformed(format!("content is not valid UTF-8: {}", e)))
}
