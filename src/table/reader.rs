//! Parsing of whitespace-delimited result files into [`Table`]s.
//!
//! The first non-blank line is the header: its whitespace-separated tokens
//! name the columns. Every following non-blank line holds one value per
//! column. Blank lines are ignored and there is no quoting or comment
//! syntax.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use super::column::{ColumnKind, Value};
use super::index::{self, ColumnIndex, INT_MAPPED_COLUMNS};
use super::Table;
use crate::error::{Result, TableError};
use crate::paths::expand_env;

/// Options controlling column typing and index map generation.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Columns parsed as integers in addition to the built-in identifier columns.
    pub int_columns: HashSet<String>,
    /// Build `<column>2row` maps for the built-in identifier and time columns.
    pub index_maps: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds columns to parse as integers.
    pub fn with_int_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.int_columns.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_index_maps(mut self, enabled: bool) -> Self {
        self.index_maps = enabled;
        self
    }

    /// Kind a column with this name is parsed as.
    pub fn kind_of(&self, name: &str) -> ColumnKind {
        if INT_MAPPED_COLUMNS.contains(&name) || self.int_columns.contains(name) {
            ColumnKind::Int
        } else {
            ColumnKind::Float
        }
    }
}

/// Reads the table stored at `path`.
///
/// Environment variables in `path` (`$VAR`, `${VAR}`) are expanded first.
///
/// # Errors
///
/// Returns [`TableError::NotFound`] if the path is not an existing file, and
/// the errors of [`parse_table`] for malformed contents.
pub fn read_table(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Table> {
    let path = expand_env(path.as_ref());
    if !path.is_file() {
        return Err(TableError::NotFound { path });
    }
    let file = File::open(&path).map_err(|source| TableError::Io {
        path: path.clone(),
        source,
    })?;
    let table = parse_table(BufReader::new(file), &path, options)?;
    debug!(
        "read {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Parses a table from any buffered reader. `source` names the input in errors.
///
/// # Errors
///
/// * [`TableError::MalformedHeader`] if there is no header or a name repeats
/// * [`TableError::RowShapeMismatch`] if a row has the wrong number of values
/// * [`TableError::TypeParseFailure`] if a value does not parse as its column kind
/// * [`TableError::Io`] if reading fails
pub fn parse_table<R: BufRead>(reader: R, source: &Path, options: &ReadOptions) -> Result<Table> {
    let io_err = |source_err| TableError::Io {
        path: source.to_path_buf(),
        source: source_err,
    };

    let mut lines = reader.lines().enumerate();

    let mut header = None;
    for (_, line) in lines.by_ref() {
        let line = line.map_err(io_err)?;
        if !line.trim().is_empty() {
            header = Some(line);
            break;
        }
    }
    let header = header.ok_or_else(|| TableError::MalformedHeader {
        path: source.to_path_buf(),
        reason: "the first line must name the columns, e.g. \"time ux uy uz\"".to_string(),
    })?;

    let names: Vec<&str> = header.split_whitespace().collect();
    let mut schema: Vec<(String, ColumnKind)> = Vec::with_capacity(names.len());
    for name in &names {
        if schema.iter().any(|(n, _)| n == name) {
            return Err(TableError::MalformedHeader {
                path: source.to_path_buf(),
                reason: format!("column \"{name}\" appears more than once"),
            });
        }
        schema.push((name.to_string(), options.kind_of(name)));
    }

    let mut table = Table::with_schema(&schema);
    let mut indexes: Vec<(usize, ColumnIndex)> = if options.index_maps {
        schema
            .iter()
            .enumerate()
            .filter(|(_, (name, _))| index::is_mapped_column(name))
            .map(|(i, (name, _))| (i, ColumnIndex::new(name)))
            .collect()
    } else {
        Vec::new()
    };

    for (lineno, line) in lines {
        let line = line.map_err(io_err)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != schema.len() {
            return Err(TableError::RowShapeMismatch {
                path: source.to_path_buf(),
                line: lineno + 1,
                expected: schema.len(),
                found: tokens.len(),
            });
        }

        let row = table.row_count();
        let mut values = Vec::with_capacity(tokens.len());
        for (token, (name, kind)) in tokens.iter().zip(&schema) {
            values.push(parse_value(token, *kind).ok_or_else(|| {
                TableError::TypeParseFailure {
                    path: source.to_path_buf(),
                    line: lineno + 1,
                    column: name.clone(),
                    token: token.to_string(),
                    kind: *kind,
                }
            })?);
        }
        for (col, index) in &mut indexes {
            index.insert(values[*col], row);
        }
        table.push_row(values);
    }

    table.set_indexes(indexes.into_iter().map(|(_, index)| index).collect());
    Ok(table)
}

fn parse_value(token: &str, kind: ColumnKind) -> Option<Value> {
    match kind {
        ColumnKind::Int => token.parse().ok().map(Value::Int),
        ColumnKind::Float => token.parse().ok().map(Value::Float),
    }
}
