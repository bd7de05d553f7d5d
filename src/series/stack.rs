//! Stacking per-entity result files into (entity x time-step) arrays.

use std::fmt::Display;
use std::path::PathBuf;

use log::{debug, warn};
use ndarray::{Array2, ArrayView1};

use crate::error::{Result, TableError};
use crate::table::{Column, ColumnKind, ReadOptions, Table, read_table};

/// Time column names, highest priority first.
pub const TIME_COLUMNS: &[&str] = &["Time", "time", "t"];

/// Name of the column holding broadcast auxiliary values.
pub const AUX_COLUMN: &str = "arc_len";

/// A family of result files named `<prefix>_<id><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFamily {
    pub prefix: String,
    pub suffix: String,
}

impl FileFamily {
    /// Creates a family with the usual `.res` suffix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::with_suffix(prefix, ".res")
    }

    pub fn with_suffix(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Path of the file holding entity `id`.
    pub fn path_for(&self, id: impl Display) -> PathBuf {
        PathBuf::from(format!("{}_{}{}", self.prefix, id, self.suffix))
    }
}

/// Per-entity time series stacked along a leading entity axis.
///
/// Every column is an array of shape `(entities, nt)`; row `i` holds the data
/// of the `i`-th requested entity. Integer columns are widened to `f64`, the
/// schema keeps their original kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSeriesTable {
    schema: Vec<(String, ColumnKind)>,
    columns: Vec<Array2<f64>>,
    time_column: String,
    entities: usize,
    nt: usize,
}

impl MultiSeriesTable {
    /// Number of stacked entities.
    pub fn entities(&self) -> usize {
        self.entities
    }

    /// Number of time steps per entity.
    pub fn nt(&self) -> usize {
        self.nt
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.entities, self.nt)
    }

    /// Name of the resolved time column.
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn schema(&self) -> &[(String, ColumnKind)] {
        &self.schema
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schema.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Array2<f64>> {
        self.schema
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| &self.columns[i])
    }

    /// Time series of column `name` for the entity at position `entity`.
    pub fn series(&self, name: &str, entity: usize) -> Option<ArrayView1<'_, f64>> {
        let col = self.column(name)?;
        (entity < self.entities).then(|| col.row(entity))
    }

    /// Time vector of the entity at position `entity`.
    pub fn times(&self, entity: usize) -> Option<ArrayView1<'_, f64>> {
        self.series(&self.time_column, entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array2<f64>)> {
        self.names().zip(&self.columns)
    }

    /// Flattens the given time steps of every entity into a long table.
    ///
    /// The result has an [`ENTITY_COLUMN`] column (position in the stack)
    /// followed by every column as floats, with one row per (entity, step)
    /// pair, entity major. Steps past `nt` are skipped. If the files already
    /// carry a column of that name, the position column gets trailing
    /// underscores until its name is free.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Table::from_columns`]; the columns built here
    /// are always equally long with distinct names.
    pub fn select_steps(&self, steps: &[usize]) -> Result<Table> {
        let steps: Vec<usize> = steps.iter().copied().filter(|&s| s < self.nt).collect();
        let rows = self.entities * steps.len();
        let mut entity = Vec::with_capacity(rows);
        for i in 0..self.entities {
            entity.extend(std::iter::repeat_n(i as i64, steps.len()));
        }
        let mut position_name = ENTITY_COLUMN.to_string();
        while self.column(&position_name).is_some() {
            position_name.push('_');
        }
        if position_name != ENTITY_COLUMN {
            debug!(
                "\"{ENTITY_COLUMN}\" is a data column, entity positions go to \"{position_name}\""
            );
        }
        let mut columns = vec![(position_name, Column::Int(entity))];
        for (name, values) in self.iter() {
            let mut out = Vec::with_capacity(rows);
            for i in 0..self.entities {
                out.extend(steps.iter().map(|&s| values[[i, s]]));
            }
            columns.push((name.to_string(), Column::Float(out)));
        }
        Table::from_columns(columns)
    }
}

/// Entity position column of [`MultiSeriesTable::select_steps`] output.
pub const ENTITY_COLUMN: &str = "entity";

/// Returns the time column of `table`, trying [`TIME_COLUMNS`] in order.
pub fn resolve_time_column(table: &Table) -> Option<&'static str> {
    TIME_COLUMNS.iter().copied().find(|name| table.contains(name))
}

/// Reads one file per entity id from `family` and stacks them.
///
/// The first file read is the schema reference: every other file must have
/// exactly its columns and the same number of rows. When `aux` is given it
/// holds one value per entity, broadcast over the time axis into the
/// [`AUX_COLUMN`] column.
///
/// # Errors
///
/// * [`TableError::EmptyInput`] if `ids` is empty
/// * [`TableError::AuxiliaryLength`] if `aux` does not hold one value per id
/// * [`TableError::MissingTimeColumn`] if the reference has no time column
/// * [`TableError::SchemaMismatch`] if a file's columns differ from the reference
/// * [`TableError::LengthMismatch`] if a file's row count differs from `nt`
/// * any error of [`read_table`]
pub fn stack_by_entity<I: Display>(
    family: &FileFamily,
    ids: &[I],
    aux: Option<&[f64]>,
    options: &ReadOptions,
) -> Result<MultiSeriesTable> {
    let (first, rest) = ids
        .split_first()
        .ok_or(TableError::EmptyInput("no entity ids to stack"))?;
    if let Some(values) = aux {
        if values.len() != ids.len() {
            return Err(TableError::AuxiliaryLength {
                expected: ids.len(),
                found: values.len(),
            });
        }
    }

    let options = ReadOptions {
        index_maps: false,
        ..options.clone()
    };

    let first_path = family.path_for(first);
    let reference = read_table(&first_path, &options)?;
    let time_column = resolve_time_column(&reference)
        .ok_or_else(|| TableError::MissingTimeColumn {
            path: first_path.clone(),
        })?
        .to_string();
    let nt = reference.row_count();
    let entities = ids.len();
    debug!(
        "stacking {entities} entities from {}_*{}: {} columns, nt = {nt}",
        family.prefix,
        family.suffix,
        reference.column_count()
    );

    let mut schema = reference.schema();
    let mut columns: Vec<Array2<f64>> = vec![Array2::zeros((entities, nt)); schema.len()];
    fill_entity(&mut columns, &schema, 0, &reference);

    for (i, id) in rest.iter().enumerate() {
        let path = family.path_for(id);
        let table = read_table(&path, &options)?;
        check_schema(&reference, &table, &path)?;
        if table.row_count() != nt {
            return Err(TableError::LengthMismatch {
                path,
                column: time_column,
                expected: nt,
                found: table.row_count(),
            });
        }
        fill_entity(&mut columns, &schema, i + 1, &table);
    }

    if let Some(values) = aux {
        let broadcast = Array2::from_shape_fn((entities, nt), |(i, _)| values[i]);
        match schema.iter().position(|(n, _)| n == AUX_COLUMN) {
            Some(pos) => {
                warn!("auxiliary values replace the \"{AUX_COLUMN}\" column read from file");
                schema[pos].1 = ColumnKind::Float;
                columns[pos] = broadcast;
            }
            None => {
                schema.push((AUX_COLUMN.to_string(), ColumnKind::Float));
                columns.push(broadcast);
            }
        }
    }

    Ok(MultiSeriesTable {
        schema,
        columns,
        time_column,
        entities,
        nt,
    })
}

fn check_schema(reference: &Table, table: &Table, path: &std::path::Path) -> Result<()> {
    let missing = reference.names().iter().find(|n| !table.contains(n));
    let extra = table.names().iter().find(|n| !reference.contains(n));
    match missing.or(extra) {
        Some(column) => Err(TableError::SchemaMismatch {
            path: path.to_path_buf(),
            column: column.clone(),
        }),
        None => Ok(()),
    }
}

fn fill_entity(
    columns: &mut [Array2<f64>],
    schema: &[(String, ColumnKind)],
    entity: usize,
    table: &Table,
) {
    for (dest, (name, _)) in columns.iter_mut().zip(schema) {
        if let Some(src) = table.column(name) {
            for (cell, value) in dest.row_mut(entity).iter_mut().zip(src.to_f64_vec()) {
                *cell = value;
            }
        }
    }
}
