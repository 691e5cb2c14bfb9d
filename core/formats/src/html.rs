//! FILENAME: core/formats/src/html.rs
//! PURPOSE: HTML table extraction (parse only; HTML is not an export target).
//! CONTEXT: Requires a <table> element. Headers come from <th> cells; data
//! rows are the <tr> elements after the header row, with cells matched to
//! headers by position. Runs on the lenient XML reader so ordinary
//! tag-soup documents still parse as long as the table itself is sane.

use crate::error::FormatError;
use engine::{coerce, Row, Table};
use quick_xml::events::Event;
use quick_xml::Reader;

pub fn parse_html(text: &str) -> Result<Table, FormatError> {
    let mut reader = Reader::from_str(text);
    // HTML closes tags loosely; do not insist on matching end names
    reader.check_end_names(false);

    let mut saw_table = false;
    let mut in_table = false;
    let mut headers: Vec<String> = Vec::new();
    let mut data_rows: Vec<Vec<String>> = Vec::new();

    // (is_header_cell, text) pairs of the <tr> being read
    let mut tr_cells: Option<Vec<(bool, String)>> = None;
    let mut cell: Option<(bool, String)> = None;

    loop {
        match reader.read_event() {
            Err(e) => return Err(e.into()),
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                match start.name().as_ref() {
                    b"table" if !saw_table => {
                        saw_table = true;
                        in_table = true;
                    }
                    b"tr" if in_table => {
                        tr_cells = Some(Vec::new());
                    }
                    b"th" | b"td" if tr_cells.is_some() => {
                        cell = Some((start.name().as_ref() == b"th", String::new()));
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(start)) => {
                if let (b"th" | b"td", Some(cells)) = (start.name().as_ref(), &mut tr_cells) {
                    cells.push((start.name().as_ref() == b"th", String::new()));
                }
            }
            Ok(Event::Text(t)) => {
                if let Some((_, text)) = &mut cell {
                    // Fall back to the raw bytes when the document uses
                    // HTML-only entities the XML unescaper cannot resolve
                    match t.unescape() {
                        Ok(s) => text.push_str(&s),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok(Event::End(end)) => match end.name().as_ref() {
                b"th" | b"td" => {
                    if let (Some(cells), Some(done)) = (&mut tr_cells, cell.take()) {
                        cells.push(done);
                    }
                }
                b"tr" => {
                    if let Some(cells) = tr_cells.take() {
                        let is_header_row =
                            headers.is_empty() && cells.iter().any(|(is_th, _)| *is_th);
                        let texts: Vec<String> =
                            cells.into_iter().map(|(_, text)| text).collect();
                        if is_header_row {
                            headers = texts;
                        } else {
                            data_rows.push(texts);
                        }
                    }
                }
                b"table" => {
                    if in_table {
                        in_table = false;
                    }
                }
                _ => {}
            },
            Ok(_) => {}
        }
    }

    if !saw_table {
        return Err(FormatError::Malformed(
            "no <table> element found".to_string(),
        ));
    }
    if headers.is_empty() {
        return Err(FormatError::Malformed(
            "table has no <th> header cells".to_string(),
        ));
    }
    if data_rows.is_empty() {
        return Err(FormatError::Empty);
    }

    let mut rows: Vec<Row> = Vec::with_capacity(data_rows.len());
    for cells in data_rows {
        let mut row = Row::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            // Positional match; short rows fill with null
            row.insert(name.clone(), coerce(cells.get(idx).map(String::as_str)));
        }
        rows.push(row);
    }
    Ok(Table::from_rows(headers.clone(), rows))
}
