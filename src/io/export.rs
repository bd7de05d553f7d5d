//! Table export in the whitespace-delimited result format and as CSV.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::table::Table;

/// Exports `table` to `path` in the format read by [`crate::table::read_table`].
///
/// # Arguments
///
/// * `table` - Table to write, columns in header order
/// * `path` - Output file path, created or truncated
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_table(table: &Table, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_table(table, buf)
}

/// Writes `table` as a header line followed by space-separated rows.
///
/// Integers are written verbatim and floats with enough digits to read back
/// the identical value.
///
/// # Arguments
///
/// * `table` - Table to write, columns in header order
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_table(table: &Table, writer: impl Write) -> io::Result<()> {
    write_delimited(table, writer, b' ')
}

/// Exports `table` to `path` as comma-separated values.
///
/// # Arguments
///
/// * `table` - Table to write, e.g. the rows selected at aligned stations
/// * `path` - Output file path, created or truncated
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(table: &Table, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(table, buf)
}

/// Writes `table` as CSV with a header row.
///
/// # Arguments
///
/// * `table` - Table to write
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(table: &Table, writer: impl Write) -> io::Result<()> {
    write_delimited(table, writer, b',')
}

fn write_delimited(table: &Table, writer: impl Write, delimiter: u8) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(table.names())?;

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .iter()
            .filter_map(|(_, column)| column.get(row))
            .map(|value| value.to_string())
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
