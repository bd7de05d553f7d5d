//! Whitespace-delimited result tables, per-entity series stacking, and
//! time-station alignment.

pub mod align;
pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
/// Table export.
pub mod io;
pub mod job;
pub mod paths;
/// Multi-file aggregation.
pub mod series;
pub mod table;

pub use error::{Result, TableError};
pub use table::{Column, ColumnKind, ReadOptions, Table, Value, read_table};
