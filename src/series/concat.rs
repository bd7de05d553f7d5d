//! Concatenation of result files written in increasing time order.

use std::path::Path;

use log::{debug, warn};

use crate::error::{Result, TableError};
use crate::table::{ReadOptions, Table, read_table};

/// Reads `paths` in order and appends their rows into one table.
///
/// The first file fixes the starting column set. A column missing from any
/// later file is dropped from the result, so the result holds the columns
/// common to all files in first-file order. Columns only present in later
/// files are ignored. The files are assumed to be in increasing time order;
/// this is not checked. Index maps are never built.
///
/// # Errors
///
/// Returns [`TableError::EmptyInput`] if `paths` is empty, or the first
/// error of [`read_table`].
pub fn concatenate<P: AsRef<Path>>(paths: &[P], options: &ReadOptions) -> Result<Table> {
    let (first, rest) = paths
        .split_first()
        .ok_or(TableError::EmptyInput("no files to concatenate"))?;

    let options = ReadOptions {
        index_maps: false,
        ..options.clone()
    };

    let mut acc = read_table(first, &options)?;
    for path in rest {
        let next = read_table(path, &options)?;
        let dropped = acc.retain_columns(|name| next.contains(name));
        for name in &dropped {
            warn!(
                "column \"{name}\" is missing from {} and was dropped",
                path.as_ref().display()
            );
        }
        acc.append_rows(&next);
    }
    debug!(
        "concatenated {} files into {} rows x {} columns",
        paths.len(),
        acc.row_count(),
        acc.column_count()
    );
    Ok(acc)
}
