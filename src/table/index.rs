//! Value-to-row lookup maps for identifier and time columns.

use std::collections::HashMap;

use super::column::{Column, Value};

/// Integer-valued identifier columns that always parse as integers and are
/// indexed when index maps are requested.
pub const INT_MAPPED_COLUMNS: &[&str] = &["id", "Id", "tag", "Tag"];

/// Time-like columns indexed when index maps are requested.
pub const FLOAT_MAPPED_COLUMNS: &[&str] = &["time", "Time"];

/// Returns true if `name` is one of the built-in indexed column names.
pub fn is_mapped_column(name: &str) -> bool {
    INT_MAPPED_COLUMNS.contains(&name) || FLOAT_MAPPED_COLUMNS.contains(&name)
}

/// Hashable form of a cell value.
///
/// Floats key by bit pattern, with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Int(i64),
    Float(u64),
}

impl From<Value> for IndexKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(v) => IndexKey::Int(v),
            Value::Float(v) => {
                let v = if v == 0.0 { 0.0 } else { v };
                IndexKey::Float(v.to_bits())
            }
        }
    }
}

/// Rows where one value occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
    /// The value occurs in exactly one row.
    Unique(usize),
    /// The value occurs in several rows, in discovery order.
    Duplicated(Vec<usize>),
}

impl RowRef {
    /// All rows holding the value, in discovery order.
    pub fn rows(&self) -> &[usize] {
        match self {
            RowRef::Unique(row) => std::slice::from_ref(row),
            RowRef::Duplicated(rows) => rows,
        }
    }

    /// First row holding the value.
    pub fn first(&self) -> usize {
        self.rows()[0]
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, RowRef::Unique(_))
    }

    fn record(&mut self, row: usize) {
        match self {
            RowRef::Unique(first) => *self = RowRef::Duplicated(vec![*first, row]),
            RowRef::Duplicated(rows) => rows.push(row),
        }
    }
}

/// Value-to-row map for one column, exposed under the key `"<column>2row"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnIndex {
    column: String,
    rows: HashMap<IndexKey, RowRef>,
}

impl ColumnIndex {
    pub(crate) fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            rows: HashMap::new(),
        }
    }

    /// Builds the index for an already loaded column.
    pub fn build(name: &str, column: &Column) -> Self {
        let mut index = Self::new(name);
        for row in 0..column.len() {
            if let Some(value) = column.get(row) {
                index.insert(value, row);
            }
        }
        index
    }

    /// Synthetic key naming this index, e.g. `id2row`.
    pub fn key_for(column: &str) -> String {
        format!("{column}2row")
    }

    pub fn key(&self) -> String {
        Self::key_for(&self.column)
    }

    /// Name of the indexed column.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn insert(&mut self, value: Value, row: usize) {
        self.rows
            .entry(IndexKey::from(value))
            .and_modify(|r| r.record(row))
            .or_insert(RowRef::Unique(row));
    }

    pub fn get(&self, value: Value) -> Option<&RowRef> {
        self.rows.get(&IndexKey::from(value))
    }

    pub fn get_int(&self, value: i64) -> Option<&RowRef> {
        self.get(Value::Int(value))
    }

    pub fn get_float(&self, value: f64) -> Option<&RowRef> {
        self.get(Value::Float(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndexKey, &RowRef)> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_values_stay_scalar() {
        let idx = ColumnIndex::build("id", &Column::Int(vec![10, 20, 30]));
        assert_eq!(idx.len(), 3);
        assert!(idx.iter().all(|(_, r)| r.is_unique()));
        assert_eq!(idx.get_int(20), Some(&RowRef::Unique(1)));
    }

    #[test]
    fn second_occurrence_promotes_to_list() {
        let idx = ColumnIndex::build("tag", &Column::Int(vec![-1, -2, -1, -1]));
        assert_eq!(idx.get_int(-1), Some(&RowRef::Duplicated(vec![0, 2, 3])));
        assert_eq!(idx.get_int(-2), Some(&RowRef::Unique(1)));
    }

    #[test]
    fn float_keys_fold_negative_zero() {
        let idx = ColumnIndex::build("time", &Column::Float(vec![0.0, 0.5]));
        assert_eq!(idx.get_float(-0.0), Some(&RowRef::Unique(0)));
        assert_eq!(idx.get_float(0.5).map(RowRef::first), Some(1));
        assert!(idx.get_float(0.25).is_none());
    }

    #[test]
    fn key_naming() {
        assert_eq!(ColumnIndex::key_for("Time"), "Time2row");
        assert!(is_mapped_column("Tag"));
        assert!(!is_mapped_column("t"));
    }
}
