//! Config-driven loading, alignment, and row extraction.

use std::fmt;
use std::path::PathBuf;

use log::info;
use serde::Serialize;

use crate::align::{CountedStation, align_stations_counted};
use crate::config::JobConfig;
use crate::error::{Result, TableError};
use crate::series::{
    FileFamily, MultiSeriesTable, concatenate, resolve_time_column, stack_by_entity,
};
use crate::table::{ColumnKind, Table, Value, read_table};

/// Data loaded by a job.
#[derive(Debug, Clone)]
pub enum Loaded {
    /// A single file or a concatenation of files.
    Table(Table),
    /// A stacked per-entity file family.
    Series(MultiSeriesTable),
}

/// Result of [`run_job`].
#[derive(Debug, Clone)]
pub struct JobReport {
    pub loaded: Loaded,
    /// Column the stations were aligned against.
    pub time_column: String,
    /// Number of requested stations.
    pub requested: usize,
    /// Resolved stations, in request order, misses omitted.
    pub stations: Vec<CountedStation>,
    /// Rows at the resolved stations.
    pub selected: Table,
}

impl JobReport {
    /// Requested stations that found no available time.
    pub fn missed(&self) -> usize {
        self.requested - self.stations.len()
    }

    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let (rows, entities) = match &self.loaded {
            Loaded::Table(t) => (t.row_count(), None),
            Loaded::Series(s) => (s.nt(), Some(s.entities())),
        };
        let columns = match &self.loaded {
            Loaded::Table(t) => t.schema(),
            Loaded::Series(s) => s.schema().to_vec(),
        };
        let view = JsonReport {
            columns: columns
                .into_iter()
                .map(|(name, kind)| JsonColumn { name, kind })
                .collect(),
            rows,
            entities,
            time_column: &self.time_column,
            requested: self.requested,
            missed: self.missed(),
            stations: &self.stations,
            selected_columns: self.selected.names(),
            selected: (0..self.selected.row_count())
                .filter_map(|r| self.selected.row(r))
                .collect(),
        };
        serde_json::to_string_pretty(&view)
    }
}

#[derive(Serialize)]
struct JsonColumn {
    name: String,
    kind: ColumnKind,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    columns: Vec<JsonColumn>,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    entities: Option<usize>,
    time_column: &'a str,
    requested: usize,
    missed: usize,
    stations: &'a [CountedStation],
    selected_columns: &'a [String],
    selected: Vec<Vec<Value>>,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.loaded {
            Loaded::Table(t) => {
                writeln!(f, "--- Table ---")?;
                writeln!(f, "Rows:          {}", t.row_count())?;
                for (name, column) in t.iter() {
                    writeln!(f, "  {name:<16} {}", column.kind())?;
                }
                for index in t.indexes() {
                    writeln!(f, "  {:<16} {} keys", index.key(), index.len())?;
                }
            }
            Loaded::Series(s) => {
                writeln!(f, "--- Series ---")?;
                writeln!(f, "Entities:      {}", s.entities())?;
                writeln!(f, "Time steps:    {}", s.nt())?;
                for (name, kind) in s.schema() {
                    writeln!(f, "  {name:<16} {kind}")?;
                }
            }
        }
        writeln!(f, "Time column:   {}", self.time_column)?;
        if self.requested == 0 {
            return Ok(());
        }
        writeln!(
            f,
            "Stations:      {} of {} resolved",
            self.stations.len(),
            self.requested
        )?;
        for s in &self.stations {
            writeln!(f, "  #{:<3} row {:<6} t = {}", s.ordinal, s.index, s.time)?;
        }
        writeln!(f, "{}", self.selected.names().join(" "))?;
        for r in 0..self.selected.row_count() {
            if let Some(values) = self.selected.row(r) {
                let line: Vec<String> = values.iter().map(Value::to_string).collect();
                writeln!(f, "{}", line.join(" "))?;
            }
        }
        Ok(())
    }
}

/// Loads the job input, aligns the configured stations, and extracts the
/// matching rows.
///
/// The configuration is expected to have passed [`JobConfig::validate`].
///
/// # Errors
///
/// Returns the first read or aggregation error, or
/// [`TableError::MissingTimeColumn`] if stations are requested and the
/// input has no usable time column.
pub fn run_job(cfg: &JobConfig) -> Result<JobReport> {
    let options = cfg.input.read_options();
    let stations = &cfg.align.stations;

    let (loaded, source) = match &cfg.input.family {
        Some(fam) => {
            let family = FileFamily::with_suffix(fam.prefix.clone(), fam.suffix.clone());
            let aux = (!fam.arc_lengths.is_empty()).then_some(fam.arc_lengths.as_slice());
            let source = fam.ids.first().map(|id| family.path_for(id));
            let series = stack_by_entity(&family, &fam.ids, aux, &options)?;
            (Loaded::Series(series), source)
        }
        None => {
            let source = cfg.input.files.first().map(PathBuf::from);
            let table = match cfg.input.files.as_slice() {
                [] => return Err(TableError::EmptyInput("no input files")),
                [single] => read_table(single, &options)?,
                many => concatenate(many, &options)?,
            };
            (Loaded::Table(table), source)
        }
    };
    let source = source.unwrap_or_default();

    let time_column = match (&cfg.align.time_column, &loaded) {
        (Some(name), _) => Some(name.clone()),
        (None, Loaded::Table(t)) => resolve_time_column(t).map(str::to_string),
        (None, Loaded::Series(s)) => Some(s.time_column().to_string()),
    };

    let available: Option<Vec<f64>> = time_column.as_deref().and_then(|name| match &loaded {
        Loaded::Table(t) => t.float_column(name),
        Loaded::Series(s) => s.series(name, 0).map(|v| v.to_vec()),
    });

    let (time_column, resolved) = match (time_column, available) {
        (Some(name), Some(times)) => {
            let resolved = align_stations_counted(&times, stations, cfg.align.tolerance);
            (name, resolved)
        }
        (name, _) if !stations.is_empty() => {
            return Err(match name {
                Some(column) => TableError::SchemaMismatch {
                    path: source,
                    column,
                },
                None => TableError::MissingTimeColumn { path: source },
            });
        }
        (name, _) => (name.unwrap_or_default(), Vec::new()),
    };

    let rows: Vec<usize> = resolved.iter().map(|s| s.index).collect();
    let selected = match &loaded {
        Loaded::Table(t) => t.select_rows(&rows),
        Loaded::Series(s) => s.select_steps(&rows)?,
    };
    info!(
        "resolved {} of {} stations against \"{time_column}\"",
        resolved.len(),
        stations.len()
    );

    Ok(JobReport {
        loaded,
        time_column,
        requested: stations.len(),
        stations: resolved,
        selected,
    })
}
