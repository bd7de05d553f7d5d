//! Integration tests for reading result files from disk.

mod common;

use restab::io::export::export_table;
use restab::table::{Column, ColumnKind, ReadOptions, RowRef, read_table};
use restab::TableError;

#[test]
fn missing_file_is_not_found() {
    let dir = common::scratch_dir();
    let err = read_table(dir.path().join("absent.res"), &ReadOptions::new());
    assert!(matches!(err, Err(TableError::NotFound { .. })));
}

#[test]
fn directory_is_not_a_file() {
    let dir = common::scratch_dir();
    let err = read_table(dir.path(), &ReadOptions::new());
    assert!(matches!(err, Err(TableError::NotFound { .. })));
}

#[test]
fn column_count_matches_header_and_rows_match_data_lines() {
    let dir = common::scratch_dir();
    let path = common::write_file(
        dir.path(),
        "solid.res",
        "id  time   sx      sy\n\n1   0.0    -1.0    -2.0\n2   0.0    -1.5    -2.5\n\n3   0.5    -1.25   -2.25\n",
    );
    let t = read_table(&path, &ReadOptions::new()).expect("read should succeed");
    assert_eq!(t.column_count(), 4);
    assert_eq!(t.row_count(), 3);
    for (_, column) in t.iter() {
        assert_eq!(column.len(), 3);
    }
    assert_eq!(t.column("id").map(Column::kind), Some(ColumnKind::Int));
    assert_eq!(t.column("time").map(Column::kind), Some(ColumnKind::Float));
}

#[test]
fn write_then_read_reproduces_values() {
    let dir = common::scratch_dir();
    let opts = ReadOptions::new().with_int_columns(["step"]);
    let src = common::write_file(
        dir.path(),
        "src.res",
        "step t x y\n0 0 0.1 1e-300\n1 0.1 0.30000000000000004 -7.25\n2 0.2 3.141592653589793 2.5e10\n",
    );
    let original = read_table(&src, &opts).expect("read should succeed");

    let copy = dir.path().join("copy.res");
    export_table(&original, &copy).expect("export should succeed");
    let back = read_table(&copy, &opts).expect("re-read should succeed");

    assert_eq!(back.names(), original.names());
    assert_eq!(back.column("step"), original.column("step"));
    for name in ["t", "x", "y"] {
        let a = original.float_column(name).expect("column");
        let b = back.float_column(name).expect("column");
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() <= 1e-12 * x.abs().max(1.0), "{name}: {x} vs {y}");
        }
    }
}

#[test]
fn index_maps_promote_duplicates_only() {
    let dir = common::scratch_dir();
    let path = common::write_file(
        dir.path(),
        "nodes.res",
        "id tag x\n10 -1 0.0\n11 -2 1.0\n12 -1 2.0\n13 -3 3.0\n",
    );
    let opts = ReadOptions::new().with_index_maps(true);
    let t = read_table(&path, &opts).expect("read should succeed");

    let ids = t.index_by_key("id2row").expect("id index");
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|(_, r)| r.is_unique()));

    let tags = t.index_by_key("tag2row").expect("tag index");
    assert_eq!(tags.get_int(-1), Some(&RowRef::Duplicated(vec![0, 2])));
    assert_eq!(tags.get_int(-2), Some(&RowRef::Unique(1)));
    assert_eq!(tags.get_int(-3), Some(&RowRef::Unique(3)));
    assert!(t.index_by_key("x2row").is_none());
}

#[test]
fn index_maps_off_by_default() {
    let dir = common::scratch_dir();
    let path = common::write_file(dir.path(), "a.res", "id x\n1 0\n");
    let t = read_table(&path, &ReadOptions::new()).expect("read should succeed");
    assert!(t.indexes().is_empty());
}

#[test]
fn input_path_expands_environment_variables() {
    let dir = common::scratch_dir();
    common::write_file(dir.path(), "out.res", "time x\n0.0 1.5\n0.5 2.5\n");
    // SAFETY: the variable name is unique to this test and only read here.
    unsafe { std::env::set_var("RESTAB_TEST_RESULTS_DIR", dir.path()) };

    for template in ["$RESTAB_TEST_RESULTS_DIR/out.res", "${RESTAB_TEST_RESULTS_DIR}/out.res"] {
        let t = read_table(template, &ReadOptions::new()).expect("expanded path should read");
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.float_column("x"), Some(vec![1.5, 2.5]));
    }
}

#[test]
fn parse_error_reports_file_and_line() {
    let dir = common::scratch_dir();
    let path = common::write_file(dir.path(), "bad.res", "x y\n1 2\n3 oops\n");
    let err = read_table(&path, &ReadOptions::new()).expect_err("read should fail");
    let msg = err.to_string();
    assert!(msg.contains("bad.res"));
    assert!(msg.contains("line 3"));
    assert!(msg.contains("oops"));
}
