//! FILENAME: core/formats/src/sheet.rs
//! PURPOSE: Spreadsheet (XLSX/ODS) parsing and XLSX serialization.
//! CONTEXT: Binary workbook decoding/encoding sits behind the `SheetCodec`
//! seam; the engine itself only ever sees rows of scalars. The default
//! codec reads XLSX and ODS through calamine and writes XLSX through
//! rust_xlsxwriter.

use crate::detect::FormatTag;
use crate::error::FormatError;
use calamine::{Data, Ods, Reader, Xlsx};
use engine::{Row, Scalar, Table};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;

/// Narrow capability interface for binary workbook formats.
pub trait SheetCodec {
    /// Decodes the first sheet of a workbook into a grid of scalars.
    fn decode(&self, bytes: &[u8], tag: FormatTag) -> Result<Vec<Vec<Scalar>>, FormatError>;

    /// Encodes a table as a single-sheet workbook.
    fn encode(&self, table: &Table, sheet_name: &str) -> Result<Vec<u8>, FormatError>;
}

/// Default codec backed by calamine (read) and rust_xlsxwriter (write).
pub struct WorkbookCodec;

impl SheetCodec for WorkbookCodec {
    fn decode(&self, bytes: &[u8], tag: FormatTag) -> Result<Vec<Vec<Scalar>>, FormatError> {
        let cursor = Cursor::new(bytes.to_vec());
        match tag {
            FormatTag::Xlsx => {
                let mut workbook: Xlsx<_> = Xlsx::new(cursor)?;
                read_first_sheet(&mut workbook)
            }
            FormatTag::Ods => {
                let mut workbook: Ods<_> = Ods::new(cursor)?;
                read_first_sheet(&mut workbook)
            }
            other => Err(FormatError::Unsupported(other)),
        }
    }

    fn encode(&self, table: &Table, sheet_name: &str) -> Result<Vec<u8>, FormatError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (col, name) in table.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, name)?;
        }
        for (row_idx, row) in table.rows.iter().enumerate() {
            let sheet_row = (row_idx + 1) as u32;
            for (col, name) in table.headers.iter().enumerate() {
                match row.get(name) {
                    None | Some(Scalar::Null) => {}
                    Some(Scalar::Number(n)) => {
                        worksheet.write_number(sheet_row, col as u16, *n)?;
                    }
                    Some(Scalar::Boolean(b)) => {
                        worksheet.write_boolean(sheet_row, col as u16, *b)?;
                    }
                    Some(Scalar::Text(s)) => {
                        worksheet.write_string(sheet_row, col as u16, s)?;
                    }
                }
            }
        }
        Ok(workbook.save_to_buffer()?)
    }
}

fn read_first_sheet<RS, R>(workbook: &mut R) -> Result<Vec<Vec<Scalar>>, FormatError>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names.first().ok_or(FormatError::Empty)?;

    // Only the first sheet is read
    let range = workbook
        .worksheet_range(first)
        .map_err(|e| FormatError::Malformed(e.to_string()))?;

    let mut grid = Vec::new();
    for row in range.rows() {
        grid.push(row.iter().map(scalar_from_cell).collect());
    }
    Ok(grid)
}

fn scalar_from_cell(cell: &Data) -> Scalar {
    match cell {
        Data::Empty => Scalar::Null,
        Data::String(s) => Scalar::Text(s.clone()),
        Data::Float(f) => Scalar::Number(*f),
        Data::Int(i) => Scalar::Number(*i as f64),
        Data::Bool(b) => Scalar::Boolean(*b),
        Data::Error(e) => Scalar::Text(format!("{:?}", e)),
        // Serial date numbers stay numeric; ISO strings stay text
        Data::DateTime(dt) => Scalar::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Scalar::Text(s.clone()),
        Data::DurationIso(s) => Scalar::Text(s.clone()),
    }
}

/// Parses a binary workbook: first row is headers, remaining rows are data.
/// An empty sheet is an error, not an empty table.
pub fn parse_sheet(
    bytes: &[u8],
    tag: FormatTag,
    codec: &dyn SheetCodec,
) -> Result<Table, FormatError> {
    let grid = codec.decode(bytes, tag)?;
    let mut grid_rows = grid.into_iter();

    let header_cells = grid_rows.next().ok_or(FormatError::Empty)?;
    let headers: Vec<String> = header_cells.iter().map(|c| c.render()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(FormatError::Empty);
    }

    let mut rows: Vec<Row> = Vec::new();
    for cells in grid_rows {
        if cells.iter().all(Scalar::is_null) {
            continue;
        }
        let mut row = Row::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            row.insert(name.clone(), cells.get(idx).cloned().unwrap_or(Scalar::Null));
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(Table::from_rows(headers, rows))
}
