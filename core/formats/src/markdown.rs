//! FILENAME: core/formats/src/markdown.rs
//! PURPOSE: Markdown pipe-table parsing and serialization.
//! CONTEXT: Needs at least a header line and a separator line. The header
//! count fixes column arity for every data line; short lines pad with
//! null. Literal pipes and backslashes inside a cell are escaped as \| and
//! \\ on the way out and unescaped on the way back in.

use crate::error::FormatError;
use engine::{coerce, Row, Scalar, Table};

pub fn parse_markdown(text: &str) -> Result<Table, FormatError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| FormatError::Malformed("missing table header line".to_string()))?;
    let separator_line = lines
        .next()
        .ok_or_else(|| FormatError::Malformed("missing table separator line".to_string()))?;

    let headers = split_pipe_row(header_line);
    if headers.is_empty() {
        return Err(FormatError::Malformed(
            "header line has no columns".to_string(),
        ));
    }
    let separators = split_pipe_row(separator_line);
    if separators.is_empty() || !separators.iter().all(|cell| is_separator_cell(cell)) {
        return Err(FormatError::Malformed(
            "separator line must be dashes with optional alignment colons".to_string(),
        ));
    }

    let mut rows: Vec<Row> = Vec::new();
    for line in lines {
        let cells = split_pipe_row(line);
        let mut row = Row::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            row.insert(name.clone(), coerce(cells.get(idx).map(String::as_str)));
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(Table::from_rows(headers, rows))
}

/// Splits a table line on unescaped pipes, trimming each cell and
/// unescaping `\|` to a literal pipe. Leading/trailing border pipes
/// contribute empty edge cells, which are stripped.
fn split_pipe_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            // \| and \\ collapse to their literal character; any other
            // backslash sequence passes through untouched
            if c != '|' && c != '\\' {
                current.push('\\');
            }
            current.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '|' {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }
    if escaped {
        current.push('\\');
    }
    cells.push(current.trim().to_string());

    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

/// Per-column separator rule: `:?-+:?`.
fn is_separator_cell(cell: &str) -> bool {
    let body = cell.strip_prefix(':').unwrap_or(cell);
    let body = body.strip_suffix(':').unwrap_or(body);
    !body.is_empty() && body.chars().all(|c| c == '-')
}

pub fn write_markdown(table: &Table) -> Result<Vec<u8>, FormatError> {
    let mut out = String::new();
    push_line(&mut out, table.headers.iter().map(|h| escape_cell(h)));
    push_line(&mut out, table.headers.iter().map(|_| "---".to_string()));
    for row in &table.rows {
        push_line(
            &mut out,
            table.headers.iter().map(|name| match row.get(name) {
                None | Some(Scalar::Null) => String::new(),
                Some(value) => escape_cell(&value.render()),
            }),
        );
    }
    Ok(out.into_bytes())
}

fn escape_cell(text: &str) -> String {
    text.replace('\\', "\\\\").replace('|', "\\|")
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>) {
    out.push_str("| ");
    out.push_str(&cells.collect::<Vec<_>>().join(" | "));
    out.push_str(" |\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pipe_table() {
        let table = parse_markdown(
            "| id | name |\n| --- | --- |\n| 1 | Alice |\n| 2 | Bob |",
        )
        .unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.cell(0, "id"), Some(&Scalar::Number(1.0)));
        assert_eq!(
            table.cell(1, "name"),
            Some(&Scalar::Text("Bob".to_string()))
        );
    }

    #[test]
    fn test_parse_alignment_colons() {
        let table = parse_markdown("| a | b |\n| :--- | ---: |\n| 1 | 2 |").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_bad_separator_is_malformed() {
        assert!(matches!(
            parse_markdown("| a |\n| === |\n| 1 |"),
            Err(FormatError::Malformed(_))
        ));
        assert!(matches!(
            parse_markdown("| a |"),
            Err(FormatError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_short_data_line_pads_null() {
        let table = parse_markdown("| a | b |\n| --- | --- |\n| 1 |").unwrap();
        assert_eq!(table.cell(0, "b"), Some(&Scalar::Null));
    }

    #[test]
    fn test_parse_no_data_rows_is_empty() {
        assert!(matches!(
            parse_markdown("| a |\n| --- |"),
            Err(FormatError::Empty)
        ));
    }

    #[test]
    fn test_write_pipe_table_layout() {
        let table = crate::delimited::parse_delimited("id,name\n1,Alice\n2,Bob", b',').unwrap();
        let text = String::from_utf8(write_markdown(&table).unwrap()).unwrap();
        assert_eq!(
            text,
            "| id | name |\n| --- | --- |\n| 1 | Alice |\n| 2 | Bob |\n"
        );
    }

    #[test]
    fn test_literal_pipe_round_trip() {
        let table = Table::from_rows(
            vec!["a".to_string()],
            vec![[("a".to_string(), Scalar::Text("x|y".to_string()))]
                .into_iter()
                .collect()],
        );
        let text = String::from_utf8(write_markdown(&table).unwrap()).unwrap();
        assert!(text.contains("x\\|y"));
        let reparsed = parse_markdown(&text).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn test_backslash_before_pipe_round_trip() {
        let table = Table::from_rows(
            vec!["a".to_string()],
            vec![[("a".to_string(), Scalar::Text("x\\|y".to_string()))]
                .into_iter()
                .collect()],
        );
        let text = String::from_utf8(write_markdown(&table).unwrap()).unwrap();
        assert!(text.contains("x\\\\\\|y"));
        let reparsed = parse_markdown(&text).unwrap();
        assert_eq!(reparsed, table);
    }
}
