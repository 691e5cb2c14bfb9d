//! FILENAME: core/formats/src/json.rs
//! PURPOSE: JSON parsing and serialization.
//! CONTEXT: JSON is the one text format whose values already carry a type,
//! so cells map kind-for-kind instead of going through coercion. Input must
//! be an array of flat objects; headers are the key order of the first
//! element (serde_json is built with preserve_order, so that order is the
//! document's own).

use crate::error::FormatError;
use engine::{Row, Scalar, Table};
use serde_json::Value;

pub fn parse_json(text: &str) -> Result<Table, FormatError> {
    let value: Value = serde_json::from_str(text)?;
    let items = match value {
        Value::Array(items) => items,
        _ => {
            return Err(FormatError::Malformed(
                "expected a JSON array of objects".to_string(),
            ))
        }
    };
    if items.is_empty() {
        return Err(FormatError::Empty);
    }

    let first = items[0].as_object().ok_or_else(|| {
        FormatError::Malformed("array elements must be objects".to_string())
    })?;
    let headers: Vec<String> = first.keys().cloned().collect();
    if headers.is_empty() {
        return Err(FormatError::Empty);
    }

    let mut rows: Vec<Row> = Vec::with_capacity(items.len());
    for item in &items {
        let object = item.as_object().ok_or_else(|| {
            FormatError::Malformed("array elements must be objects".to_string())
        })?;
        let mut row = Row::with_capacity(headers.len());
        for name in &headers {
            row.insert(name.clone(), scalar_from_json(object.get(name))?);
        }
        rows.push(row);
    }
    Ok(Table::from_rows(headers, rows))
}

fn scalar_from_json(value: Option<&Value>) -> Result<Scalar, FormatError> {
    match value {
        None | Some(Value::Null) => Ok(Scalar::Null),
        Some(Value::Bool(b)) => Ok(Scalar::Boolean(*b)),
        Some(Value::Number(n)) => Ok(n
            .as_f64()
            .map(Scalar::Number)
            .unwrap_or(Scalar::Null)),
        Some(Value::String(s)) => Ok(Scalar::Text(s.clone())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(FormatError::Malformed(
            "nested values are not supported; objects must be flat".to_string(),
        )),
    }
}

/// Serializes a table as a pretty-printed array of row objects with key
/// order matching the headers.
pub fn write_json(table: &Table) -> Result<Vec<u8>, FormatError> {
    let mut items: Vec<Value> = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let mut object = serde_json::Map::with_capacity(table.headers.len());
        for name in &table.headers {
            object.insert(name.clone(), scalar_to_json(row.get(name)));
        }
        items.push(Value::Object(object));
    }
    let mut bytes = serde_json::to_vec_pretty(&items)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn scalar_to_json(value: Option<&Scalar>) -> Value {
    match value {
        None | Some(Scalar::Null) => Value::Null,
        Some(Scalar::Boolean(b)) => Value::Bool(*b),
        Some(Scalar::Number(n)) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Some(Scalar::Text(s)) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_of_objects() {
        let table =
            parse_json(r#"[{"id": 1, "name": "Alice"}, {"id": 2, "name": null}]"#).unwrap();
        assert_eq!(table.headers, vec!["id", "name"]);
        assert_eq!(table.cell(0, "id"), Some(&Scalar::Number(1.0)));
        assert_eq!(table.cell(1, "name"), Some(&Scalar::Null));
    }

    #[test]
    fn test_parse_keeps_native_types() {
        // "1" as a JSON string stays text; no coercion pass for JSON
        let table = parse_json(r#"[{"a": "1", "b": true}]"#).unwrap();
        assert_eq!(table.cell(0, "a"), Some(&Scalar::Text("1".to_string())));
        assert_eq!(table.cell(0, "b"), Some(&Scalar::Boolean(true)));
    }

    #[test]
    fn test_parse_headers_from_first_element() {
        let table = parse_json(r#"[{"a": 1}, {"a": 2, "extra": 3}]"#).unwrap();
        assert_eq!(table.headers, vec!["a"]);
        assert_eq!(table.rows[1].len(), 1);
    }

    #[test]
    fn test_parse_empty_array_is_not_silent_success() {
        assert!(matches!(parse_json("[]"), Err(FormatError::Empty)));
    }

    #[test]
    fn test_parse_rejects_non_array_and_nested() {
        assert!(matches!(
            parse_json(r#"{"a": 1}"#),
            Err(FormatError::Malformed(_))
        ));
        assert!(matches!(
            parse_json(r#"[{"a": [1, 2]}]"#),
            Err(FormatError::Malformed(_))
        ));
        assert!(matches!(parse_json("not json"), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_write_pretty_with_header_key_order() {
        let table = parse_json(r#"[{"b": 1, "a": 2}]"#).unwrap();
        let text = String::from_utf8(write_json(&table).unwrap()).unwrap();
        let b_pos = text.find("\"b\"").unwrap();
        let a_pos = text.find("\"a\"").unwrap();
        assert!(b_pos < a_pos, "keys must follow header order");
        assert!(text.contains('\n'), "output is pretty-printed");
    }

    #[test]
    fn test_json_round_trip() {
        let source = r#"[{"id": 1, "name": "Alice", "active": true}]"#;
        let table = parse_json(source).unwrap();
        let reparsed =
            parse_json(&String::from_utf8(write_json(&table).unwrap()).unwrap()).unwrap();
        assert_eq!(table, reparsed);
    }
}
