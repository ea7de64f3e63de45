//! CSV export tests

use pretty_assertions::assert_eq;
use royalbit_tabular::delimited::UTF8_BOM;
use royalbit_tabular::{export_csv, CsvExporter, ExportFormat, TabularError};
use std::fs;
use std::io::{self, Write};
use tempfile::TempDir;

const SAMPLE: &str = r#"[{"a":1,"b":"x"},{"a":2,"b":"y"}]"#;

/// Parse the written file back, BOM stripped
fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(&bytes[3..]);
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// FILE CONTENT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_csv_exact_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.csv");

    export_csv(&path, SAMPLE).unwrap();

    let bytes = fs::read(&path).unwrap();
    let mut expected = UTF8_BOM.to_vec();
    expected.extend_from_slice(b"a,b\r\n1,x\r\n2,y\r\n");
    assert_eq!(bytes, expected);
}

#[test]
fn test_export_csv_round_trip_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("people.csv");
    let json = r#"[
        {"name":"Ada, Countess","age":36,"motto":"\"Poetical science\"","active":false},
        {"name":"Grace","age":85,"motto":"line one\nline two","active":true},
        {"name":"Émilie","age":42,"motto":"","active":null}
    ]"#;

    export_csv(&path, json).unwrap();

    let rows = read_back(&fs::read(&path).unwrap());
    assert_eq!(
        rows,
        vec![
            vec!["name", "age", "motto", "active"],
            vec!["Ada, Countess", "36", "\"Poetical science\"", "false"],
            vec!["Grace", "85", "line one\nline two", "true"],
            vec!["Émilie", "42", "", ""],
        ]
    );
}

#[test]
fn test_export_csv_column_order_follows_first_record() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("order.csv");

    export_csv(&path, r#"[{"z":1,"a":2,"m":3},{"m":6,"z":4,"a":5}]"#).unwrap();

    let rows = read_back(&fs::read(&path).unwrap());
    assert_eq!(rows[0], vec!["z", "a", "m"]);
    assert_eq!(rows[2], vec!["4", "5", "6"]);
}

#[test]
fn test_export_csv_missing_and_extra_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ragged.csv");

    export_csv(&path, r#"[{"a":1,"b":2},{"a":3},{"a":4,"b":5,"c":6}]"#).unwrap();

    let rows = read_back(&fs::read(&path).unwrap());
    assert_eq!(
        rows,
        vec![
            vec!["a", "b"],
            vec!["1", "2"],
            vec!["3", ""],
            vec!["4", "5"],
        ]
    );
}

#[test]
fn test_export_csv_idempotent_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("twice.csv");

    fs::write(&path, "stale content that is much longer than the export").unwrap();
    export_csv(&path, SAMPLE).unwrap();
    let first = fs::read(&path).unwrap();
    export_csv(&path, SAMPLE).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert!(!String::from_utf8_lossy(&first).contains("stale"));
}

#[test]
fn test_format_dispatch_csv() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dispatch.CSV");

    let format = ExportFormat::from_path(&path).unwrap();
    format.export(&path, SAMPLE).unwrap();

    assert_eq!(&fs::read(&path).unwrap()[..3], &UTF8_BOM);
}

#[test]
fn test_exporter_write_to_buffer() {
    let exporter = CsvExporter::from_json(SAMPLE).unwrap();
    assert_eq!(exporter.dataset().len(), 2);

    let bytes = exporter.write_to(Vec::new()).unwrap();
    assert_eq!(&bytes[3..], b"a,b\r\n1,x\r\n2,y\r\n");
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_csv_empty_array_creates_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");

    let err = export_csv(&path, "[]").unwrap_err();

    assert!(err.is_format());
    assert!(!path.exists());
}

#[test]
fn test_export_csv_first_record_without_fields_creates_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no_fields.csv");

    let err = export_csv(&path, r#"[{},{"a":1}]"#).unwrap_err();

    assert!(err.is_format());
    assert!(err.to_string().contains("first record has no fields"));
    assert!(!path.exists());
}

#[test]
fn test_export_csv_not_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.csv");

    let err = export_csv(&path, "not json").unwrap_err();

    assert!(err.is_format());
    assert!(!path.exists());
}

#[test]
fn test_export_csv_bad_input_leaves_existing_file_alone() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("keep.csv");
    fs::write(&path, "previous").unwrap();

    assert!(export_csv(&path, "{\"a\":1}").unwrap_err().is_format());
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
}

#[test]
fn test_export_csv_unwritable_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing_dir").join("out.csv");

    let err = export_csv(&path, SAMPLE).unwrap_err();
    assert!(err.is_io());
}

/// Accepts `budget` bytes, then fails every write
#[derive(Debug)]
struct FailingWriter {
    budget: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::other("disk full"));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_midway_is_io_error() {
    let rows: Vec<String> = (0..2000)
        .map(|i| format!(r#"{{"id":{i},"name":"row number {i}"}}"#))
        .collect();
    let exporter = CsvExporter::from_json(&format!("[{}]", rows.join(","))).unwrap();

    for budget in [0, 2, 64, 9000] {
        let err = exporter.write_to(FailingWriter { budget }).unwrap_err();
        assert!(
            matches!(err, TabularError::Io(_)),
            "budget {budget}: expected an IO error, got {err:?}"
        );
        assert!(err.to_string().contains("disk full"));
    }
}
