//! FILENAME: core/formats/src/delimited.rs
//! PURPOSE: CSV and TSV parsing and serialization.
//! CONTEXT: Delimited text is the one format family where the preview cap
//! applies: only a bounded prefix of rows is materialized. This is a
//! sampling policy for responsiveness, not a correctness guarantee over
//! the whole file.

use crate::error::FormatError;
use csv::{ReaderBuilder, WriterBuilder};
use engine::{coerce, Row, Table};

/// Upper bound on data rows materialized from a delimited file.
pub const PREVIEW_ROW_CAP: usize = 100;

/// Parses delimited text with a mandatory header row. Blank lines are
/// skipped; every cell goes through type coercion.
pub fn parse_delimited(text: &str, delimiter: u8) -> Result<Table, FormatError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(FormatError::Empty);
    }

    let mut rows: Vec<Row> = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Blank lines never reach here; the reader drops them. A line of
        // bare delimiters is real data and becomes a row of nulls.
        let mut row = Row::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            row.insert(name.clone(), coerce(record.get(idx)));
        }
        rows.push(row);
        if rows.len() >= PREVIEW_ROW_CAP {
            break;
        }
    }
    if rows.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(Table::from_rows(headers, rows))
}

/// Writes a table as delimited text. Quoting follows standard CSV rules:
/// fields containing the delimiter, a quote, or a line break are quoted,
/// with embedded quotes doubled.
pub fn write_delimited(table: &Table, delimiter: u8) -> Result<Vec<u8>, FormatError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(
            table
                .headers
                .iter()
                .map(|name| row.get(name).map(|v| v.render()).unwrap_or_default()),
        )?;
    }
    writer
        .into_inner()
        .map_err(|e| FormatError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Scalar;

    #[test]
    fn test_parse_csv_scenario() {
        let table = parse_delimited("id,name\n1,Alice\n2,Bob", b',').unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.cell(0, "id"), Some(&Scalar::Number(1.0)));
        assert_eq!(
            table.cell(0, "name"),
            Some(&Scalar::Text("Alice".to_string()))
        );
        assert_eq!(table.cell(1, "id"), Some(&Scalar::Number(2.0)));
        assert_eq!(
            table.cell(1, "name"),
            Some(&Scalar::Text("Bob".to_string()))
        );
    }

    #[test]
    fn test_parse_tsv() {
        let table = parse_delimited("a\tb\n1\ttrue", b'\t').unwrap();
        assert_eq!(table.cell(0, "a"), Some(&Scalar::Number(1.0)));
        assert_eq!(table.cell(0, "b"), Some(&Scalar::Boolean(true)));
    }

    #[test]
    fn test_parse_skips_blank_lines_and_fills_short_rows() {
        let table = parse_delimited("a,b\n1,2\n\n3", b',').unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, "b"), Some(&Scalar::Null));
    }

    #[test]
    fn test_parse_bare_delimiter_line_is_a_null_row() {
        let table = parse_delimited("a,b\n,\n1,2", b',').unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "a"), Some(&Scalar::Null));
        assert_eq!(table.cell(0, "b"), Some(&Scalar::Null));
        assert_eq!(table.cell(1, "a"), Some(&Scalar::Number(1.0)));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            parse_delimited("", b','),
            Err(FormatError::Empty)
        ));
        assert!(matches!(
            parse_delimited("a,b\n", b','),
            Err(FormatError::Empty)
        ));
    }

    #[test]
    fn test_preview_row_cap() {
        let mut input = String::from("n\n");
        for i in 0..(PREVIEW_ROW_CAP + 50) {
            input.push_str(&format!("{}\n", i));
        }
        let table = parse_delimited(&input, b',').unwrap();
        assert_eq!(table.row_count(), PREVIEW_ROW_CAP);
    }

    #[test]
    fn test_write_quotes_embedded_delimiters_and_quotes() {
        let table = parse_delimited("a,b\nx,y", b',').unwrap();
        let mut table = table;
        table.rows[0].insert(
            "a".to_string(),
            Scalar::Text("say \"hi\", please".to_string()),
        );
        let bytes = write_delimited(&table, b',').unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"say \"\"hi\"\", please\""));
    }

    #[test]
    fn test_csv_round_trip_up_to_coercion() {
        let source = "id,name,active\n1,Alice,true\n2,O'Brien,false";
        let table = parse_delimited(source, b',').unwrap();
        let bytes = write_delimited(&table, b',').unwrap();
        let reparsed = parse_delimited(&String::from_utf8(bytes).unwrap(), b',').unwrap();
        assert_eq!(table, reparsed);
    }
}
