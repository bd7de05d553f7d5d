//! Error taxonomy for table reading and aggregation.

use std::path::PathBuf;

use thiserror::Error;

use crate::table::ColumnKind;

/// Failure while reading or aggregating result tables.
///
/// Every variant carrying a `path` refers to the file being processed when
/// the failure happened. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("could not find file \"{}\"", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header in \"{}\": {reason}", path.display())]
    MalformedHeader { path: PathBuf, reason: String },

    #[error(
        "\"{}\" line {line}: expected {expected} values, found {found}",
        path.display()
    )]
    RowShapeMismatch {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "\"{}\" line {line}: cannot parse \"{token}\" as {kind} for column \"{column}\"",
        path.display()
    )]
    TypeParseFailure {
        path: PathBuf,
        line: usize,
        column: String,
        token: String,
        kind: ColumnKind,
    },

    #[error("\"{}\" does not match the reference schema at column \"{column}\"", path.display())]
    SchemaMismatch { path: PathBuf, column: String },

    #[error(
        "\"{}\": column \"{column}\" has {found} rows, expected {expected}",
        path.display()
    )]
    LengthMismatch {
        path: PathBuf,
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("\"{}\" has no time column (tried Time, time, t)", path.display())]
    MissingTimeColumn { path: PathBuf },

    #[error("column \"{column}\" appears more than once")]
    DuplicateColumn { column: String },

    #[error("column \"{column}\" has {found} values, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("got {found} auxiliary values for {expected} entities")]
    AuxiliaryLength { expected: usize, found: usize },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),
}

pub type Result<T> = std::result::Result<T, TableError>;
