//! Aggregation of several result files into one table.

/// Concatenation of time-ordered files.
pub mod concat;
/// Stacking of per-entity files along an entity axis.
pub mod stack;

pub use concat::concatenate;
pub use stack::{FileFamily, MultiSeriesTable, resolve_time_column, stack_by_entity};
