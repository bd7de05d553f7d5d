//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Fresh temporary directory, removed when dropped.
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("temp dir should be created")
}

/// Writes `contents` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture should be written");
    path
}

/// Result file with `Time`, `ux`, `uy` columns and `nt` rows starting at `t0`
/// with step `dt`. Values depend on `entity` so stacked rows are distinguishable.
pub fn node_result(entity: i64, t0: f64, dt: f64, nt: usize) -> String {
    let mut s = String::from("Time ux uy\n");
    for k in 0..nt {
        let t = t0 + dt * k as f64;
        let _ = writeln!(s, "{t:?} {:?} {:?}", entity as f64 + t, -(entity as f64) * t);
    }
    s
}

/// Writes `node_result` files for each id as `dir/node_<id>.res`.
///
/// Returns the family prefix (`dir/node`).
pub fn write_node_family(dir: &Path, ids: &[i64], nt: usize) -> String {
    for &id in ids {
        write_file(dir, &format!("node_{id}.res"), &node_result(id, 0.0, 0.1, nt));
    }
    dir.join("node").to_string_lossy().into_owned()
}
