//! FILENAME: core/formats/src/xml.rs
//! PURPOSE: XML element-tree parsing and serialization.
//! CONTEXT: Input rows are located by scanning for the first repeating
//! element among a fixed candidate set of row tags; headers are the child
//! tags of the first match, in document order. Cell text goes through type
//! coercion. Output nests one <row> per table row under a <rows> root.

use crate::error::FormatError;
use engine::{coerce, Row, Scalar, Table};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Candidate tag names for the repeating row element.
const ROW_TAGS: [&str; 3] = ["row", "item", "record"];

pub fn parse_xml(text: &str) -> Result<Table, FormatError> {
    let mut reader = Reader::from_str(text);

    let mut row_tag: Option<String> = None;
    let mut rows: Vec<Row> = Vec::new();
    let mut current: Option<Row> = None;
    let mut field: Option<String> = None;
    let mut field_text = String::new();

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if current.is_none() {
                    let matches_row = match &row_tag {
                        Some(tag) => *tag == name,
                        None => ROW_TAGS.contains(&name.as_str()),
                    };
                    if matches_row {
                        row_tag.get_or_insert(name);
                        current = Some(Row::new());
                    }
                } else if field.is_none() {
                    field = Some(name);
                    field_text.clear();
                }
                // Deeper nesting inside a cell is ignored; its text still
                // counts as the cell's text content
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if let (Some(row), None) = (&mut current, &field) {
                    // Self-closing child element: an empty cell
                    row.insert(name, coerce(None));
                }
            }
            Event::Text(t) => {
                if field.is_some() {
                    field_text.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if field.is_some() {
                    field_text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if field.as_deref() == Some(name.as_str()) {
                    if let Some(row) = &mut current {
                        row.insert(name, coerce(Some(field_text.as_str())));
                    }
                    field = None;
                } else if row_tag.as_deref() == Some(name.as_str()) {
                    if let Some(row) = current.take() {
                        rows.push(row);
                    }
                    field = None;
                }
            }
            _ => {}
        }
    }

    if row_tag.is_none() {
        return Err(FormatError::Malformed(
            "no repeating row element found (expected <row>, <item> or <record>)".to_string(),
        ));
    }
    if rows.is_empty() || rows[0].is_empty() {
        return Err(FormatError::Empty);
    }
    // Headers are the child tags of the first row element, in document
    // order; later rows fill missing children with null
    let headers: Vec<String> = rows[0].keys().cloned().collect();
    Ok(Table::from_rows(headers, rows))
}

/// Replaces every character outside `[A-Za-z0-9_]` to form a legal element
/// name. Shared with the SQL serializer's identifier rule.
pub fn sanitize_identifier(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

pub fn write_xml(table: &Table) -> Result<Vec<u8>, FormatError> {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rows>\n");
    for row in &table.rows {
        out.push_str("  <row>\n");
        for name in &table.headers {
            let tag = sanitize_identifier(name);
            match row.get(name) {
                None | Some(Scalar::Null) => {
                    out.push_str(&format!("    <{}/>\n", tag));
                }
                Some(value) => {
                    out.push_str(&format!(
                        "    <{}>{}</{}>\n",
                        tag,
                        escape(&value.render()),
                        tag
                    ));
                }
            }
        }
        out.push_str("  </row>\n");
    }
    out.push_str("</rows>\n");
    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row_elements() {
        let table = parse_xml(
            "<rows><row><id>1</id><name>Alice</name></row>\
             <row><id>2</id><name>Bob</name></row></rows>",
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
    fn test_parse_item_and_record_tags() {
        let table = parse_xml("<list><item><a>1</a></item><item><a>2</a></item></list>").unwrap();
        assert_eq!(table.row_count(), 2);
        let table = parse_xml("<db><record><a>x</a></record></db>").unwrap();
        assert_eq!(table.cell(0, "a"), Some(&Scalar::Text("x".to_string())));
    }

    #[test]
    fn test_parse_missing_child_is_null() {
        let table = parse_xml(
            "<rows><row><a>1</a><b>2</b></row><row><a>3</a></row></rows>",
        )
        .unwrap();
        assert_eq!(table.cell(1, "b"), Some(&Scalar::Null));
    }

    #[test]
    fn test_parse_no_row_element_is_malformed() {
        assert!(matches!(
            parse_xml("<data><entry>1</entry></data>"),
            Err(FormatError::Malformed(_))
        ));
    }

    #[test]
    fn test_write_escapes_entities_and_sanitizes_tags() {
        let table = Table::from_rows(
            vec!["col name".to_string()],
            vec![[(
                "col name".to_string(),
                Scalar::Text("a < b & \"c\"".to_string()),
            )]
            .into_iter()
            .collect()],
        );
        let text = String::from_utf8(write_xml(&table).unwrap()).unwrap();
        assert!(text.contains("<col_name>"));
        assert!(text.contains("a &lt; b &amp; &quot;c&quot;"));
    }

    #[test]
    fn test_write_null_as_empty_element() {
        let table = Table::from_rows(
            vec!["a".to_string()],
            vec![[("a".to_string(), Scalar::Null)].into_iter().collect()],
        );
        let text = String::from_utf8(write_xml(&table).unwrap()).unwrap();
        assert!(text.contains("<a/>"));
    }

    #[test]
    fn test_xml_escaping_round_trip() {
        let table = Table::from_rows(
            vec!["a".to_string()],
            vec![[(
                "a".to_string(),
                Scalar::Text("x < y & \"z\"".to_string()),
            )]
            .into_iter()
            .collect()],
        );
        let bytes = write_xml(&table).unwrap();
        let reparsed = parse_xml(&String::from_utf8(bytes).unwrap()).unwrap();
        assert_eq!(reparsed, table);
    }
}
