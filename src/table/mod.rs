//! Column-oriented tables read from whitespace-delimited result files.

/// Typed column storage.
pub mod column;
/// Value-to-row index maps.
pub mod index;
pub mod reader;

pub use column::{Column, ColumnKind, Value};
pub use index::{ColumnIndex, IndexKey, RowRef};
pub use reader::{ReadOptions, parse_table, read_table};

use crate::error::{Result, TableError};

/// A named, ordered set of equally long typed columns.
///
/// The column set and order are fixed by the header of the source file.
/// Index maps are present only for columns that were indexed at read time.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
    rows: usize,
    indexes: Vec<ColumnIndex>,
}

impl Table {
    /// Creates an empty table with the given schema.
    pub fn with_schema(schema: &[(String, ColumnKind)]) -> Self {
        Self {
            names: schema.iter().map(|(n, _)| n.clone()).collect(),
            columns: schema.iter().map(|(_, k)| Column::empty(*k)).collect(),
            rows: 0,
            indexes: Vec::new(),
        }
    }

    /// Builds a table from named columns.
    ///
    /// The first column fixes the row count.
    ///
    /// # Errors
    ///
    /// * [`TableError::RaggedColumn`] if a column's length differs from the first
    /// * [`TableError::DuplicateColumn`] if a name repeats
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Self> {
        let rows = columns.first().map_or(0, |(_, c)| c.len());
        if let Some((name, column)) = columns.iter().find(|(_, c)| c.len() != rows) {
            return Err(TableError::RaggedColumn {
                column: name.clone(),
                expected: rows,
                found: column.len(),
            });
        }
        let (names, columns): (Vec<_>, Vec<_>) = columns.into_iter().unzip();
        if let Some(name) = names
            .iter()
            .enumerate()
            .find_map(|(i, n)| names[..i].contains(n).then_some(n))
        {
            return Err(TableError::DuplicateColumn {
                column: name.clone(),
            });
        }
        Ok(Self {
            names,
            columns,
            rows,
            indexes: Vec::new(),
        })
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Column names in header order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `(name, kind)` pairs in header order.
    pub fn schema(&self) -> Vec<(String, ColumnKind)> {
        self.names
            .iter()
            .zip(&self.columns)
            .map(|(n, c)| (n.clone(), c.kind()))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Returns a column widened to floats.
    pub fn float_column(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name).map(Column::to_f64_vec)
    }

    /// Iterates `(name, column)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(&self.columns)
    }

    /// Values of one row in header order, or `None` past the end.
    pub fn row(&self, row: usize) -> Option<Vec<Value>> {
        if row >= self.rows {
            return None;
        }
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    /// Copies the given rows, in the given order, into a new table.
    ///
    /// Rows past the end are skipped. Index maps are not carried over.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let mut out = Table::with_schema(&self.schema());
        for &row in rows {
            if let Some(values) = self.row(row) {
                out.push_row(values);
            }
        }
        out
    }

    /// Index map of column `name`, if one was built.
    pub fn index(&self, name: &str) -> Option<&ColumnIndex> {
        self.indexes.iter().find(|i| i.column() == name)
    }

    /// Index map by its synthetic key, e.g. `"id2row"`.
    pub fn index_by_key(&self, key: &str) -> Option<&ColumnIndex> {
        let column = key.strip_suffix("2row")?;
        self.index(column)
    }

    pub fn indexes(&self) -> &[ColumnIndex] {
        &self.indexes
    }

    /// Appends one parsed row. `values` must follow the header order.
    pub(crate) fn push_row(&mut self, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.columns.len());
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value);
        }
        self.rows += 1;
    }

    pub(crate) fn set_indexes(&mut self, indexes: Vec<ColumnIndex>) {
        self.indexes = indexes;
    }

    /// Keeps only columns for which `keep` returns true, returning the
    /// names of the removed columns.
    pub fn retain_columns(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        let mut names = Vec::with_capacity(self.names.len());
        let mut columns = Vec::with_capacity(self.columns.len());
        for (name, column) in self.names.drain(..).zip(self.columns.drain(..)) {
            if keep(&name) {
                names.push(name);
                columns.push(column);
            } else {
                dropped.push(name);
            }
        }
        self.names = names;
        self.columns = columns;
        self.indexes.retain(|i| !dropped.iter().any(|d| d == i.column()));
        dropped
    }

    /// Appends the rows of `other` column by column.
    ///
    /// Every column of `self` must be present in `other`; extra columns of
    /// `other` are ignored. Index maps are discarded since row numbers shift.
    pub(crate) fn append_rows(&mut self, other: &Table) {
        for (name, column) in self.names.iter().zip(self.columns.iter_mut()) {
            if let Some(src) = other.column(name) {
                column.append(src);
            }
        }
        self.rows += other.rows;
        self.indexes.clear();
    }
}
