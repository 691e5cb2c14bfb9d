//! FILENAME: core/formats/src/sql.rs
//! PURPOSE: SQL serialization (export only): one CREATE TABLE plus one
//! INSERT per row.
//! CONTEXT: Column types are inferred from the first row's value only.
//! A later row with a conflicting type is not reconciled; that is a known
//! accuracy limitation of the scheme and is pinned down by a test.

use crate::error::FormatError;
use crate::xml::sanitize_identifier;
use engine::{Scalar, Table};

pub fn write_sql(table: &Table, table_name: &str) -> Result<Vec<u8>, FormatError> {
    let name = sanitize_identifier(table_name);
    let first_row = table.rows.first();

    let mut out = String::new();
    out.push_str(&format!("CREATE TABLE \"{}\" (\n", name));
    let columns: Vec<String> = table
        .headers
        .iter()
        .map(|header| {
            let sql_type = column_type(first_row.and_then(|row| row.get(header)));
            format!("  \"{}\" {}", sanitize_identifier(header), sql_type)
        })
        .collect();
    out.push_str(&columns.join(",\n"));
    out.push_str("\n);\n\n");

    let column_list: Vec<String> = table
        .headers
        .iter()
        .map(|header| format!("\"{}\"", sanitize_identifier(header)))
        .collect();
    let column_list = column_list.join(", ");

    for row in &table.rows {
        let values: Vec<String> = table
            .headers
            .iter()
            .map(|header| literal(row.get(header)))
            .collect();
        out.push_str(&format!(
            "INSERT INTO \"{}\" ({}) VALUES ({});\n",
            name,
            column_list,
            values.join(", ")
        ));
    }
    Ok(out.into_bytes())
}

/// First-row-only type inference.
fn column_type(value: Option<&Scalar>) -> &'static str {
    match value {
        Some(Scalar::Number(n)) if n.fract() == 0.0 => "INTEGER",
        Some(Scalar::Number(_)) => "REAL",
        Some(Scalar::Boolean(_)) => "BOOLEAN",
        _ => "TEXT",
    }
}

fn literal(value: Option<&Scalar>) -> String {
    match value {
        None | Some(Scalar::Null) => "NULL".to_string(),
        Some(Scalar::Boolean(b)) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Some(number @ Scalar::Number(_)) => number.render(),
        Some(Scalar::Text(s)) => format!("'{}'", s.replace('\'', "''")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Row;

    fn row(cells: &[(&str, Scalar)]) -> Row {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn render(table: &Table) -> String {
        String::from_utf8(write_sql(table, "export").unwrap()).unwrap()
    }

    #[test]
    fn test_type_inference_from_first_row() {
        let table = Table::from_rows(
            vec![
                "count".to_string(),
                "ratio".to_string(),
                "flag".to_string(),
                "label".to_string(),
            ],
            vec![row(&[
                ("count", Scalar::Number(3.0)),
                ("ratio", Scalar::Number(0.5)),
                ("flag", Scalar::Boolean(true)),
                ("label", Scalar::Text("x".to_string())),
            ])],
        );
        let text = render(&table);
        assert!(text.contains("\"count\" INTEGER"));
        assert!(text.contains("\"ratio\" REAL"));
        assert!(text.contains("\"flag\" BOOLEAN"));
        assert!(text.contains("\"label\" TEXT"));
    }

    #[test]
    fn test_conflicting_later_row_is_not_reconciled() {
        // Documented limitation: the second row's text does not demote the
        // column to TEXT
        let table = Table::from_rows(
            vec!["v".to_string()],
            vec![
                row(&[("v", Scalar::Number(1.0))]),
                row(&[("v", Scalar::Text("oops".to_string()))]),
            ],
        );
        let text = render(&table);
        assert!(text.contains("\"v\" INTEGER"));
        assert!(text.contains("VALUES ('oops');"));
    }

    #[test]
    fn test_single_quote_escaping() {
        let table = Table::from_rows(
            vec!["name".to_string()],
            vec![row(&[("name", Scalar::Text("O'Brien".to_string()))])],
        );
        let text = render(&table);
        assert!(text.contains("'O''Brien'"));
    }

    #[test]
    fn test_null_boolean_and_number_literals() {
        let table = Table::from_rows(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![row(&[
                ("a", Scalar::Null),
                ("b", Scalar::Boolean(false)),
                ("c", Scalar::Number(2.5)),
            ])],
        );
        let text = render(&table);
        assert!(text.contains("VALUES (NULL, FALSE, 2.5);"));
    }

    #[test]
    fn test_identifier_sanitization() {
        let table = Table::from_rows(
            vec!["order count".to_string()],
            vec![row(&[("order count", Scalar::Number(1.0))])],
        );
        let text = String::from_utf8(write_sql(&table, "my export").unwrap()).unwrap();
        assert!(text.contains("CREATE TABLE \"my_export\""));
        assert!(text.contains("\"order_count\" INTEGER"));
    }
}
