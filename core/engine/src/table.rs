//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The canonical table: ordered headers plus rows of named cells.
//! CONTEXT: Every parser produces a `Table` and every serializer consumes
//! one. Construction normalizes rows so the key sequence of each row always
//! equals `headers` exactly; missing cells materialize as `Scalar::Null`.

use crate::value::Scalar;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered mapping from column name to cell value.
pub type Row = IndexMap<String, Scalar>;

/// The shared in-memory representation all parsers produce and all
/// exporters consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names in presentation/export order, duplicate-free.
    pub headers: Vec<String>,
    /// Rows, each normalized to the exact header key set.
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with no columns.
    pub fn new() -> Self {
        Table {
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Builds a table from an explicit header list, normalizing every row:
    /// cells are reordered to header order, missing cells become `Null`,
    /// and keys absent from the headers are dropped. Duplicate header names
    /// keep their first occurrence.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let mut deduped: Vec<String> = Vec::with_capacity(headers.len());
        for name in headers {
            if !deduped.contains(&name) {
                deduped.push(name);
            }
        }
        let rows = rows
            .into_iter()
            .map(|mut row| {
                let mut normalized = Row::with_capacity(deduped.len());
                for name in &deduped {
                    let value = row.shift_remove(name).unwrap_or(Scalar::Null);
                    normalized.insert(name.clone(), value);
                }
                normalized
            })
            .collect();
        Table {
            headers: deduped,
            rows,
        }
    }

    /// Builds a table from bare records, deriving headers as the union of
    /// row keys in first-seen order.
    pub fn from_records(rows: Vec<Row>) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
        Table::from_rows(headers, rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.headers.is_empty()
    }

    /// Returns the cell at (row, column name), if the row exists.
    /// A `None` means the row index is out of range; a present row always
    /// holds every header key.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Scalar> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}
