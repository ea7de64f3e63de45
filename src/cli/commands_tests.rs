use super::*;
use std::io::Write;
use tempfile::TempDir;

const SAMPLE: &str = r#"[{"a":1,"b":"x"},{"a":2,"b":"y"}]"#;

fn write_input(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("input.json");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

// =========================================================================
// Logging Setup Tests
// =========================================================================

#[test]
fn test_init_tracing_twice_keeps_first_subscriber() {
    init_tracing("error");
    init_tracing("trace");
    assert!(!tracing::enabled!(tracing::Level::WARN));
}

// =========================================================================
// Input Tests
// =========================================================================

#[test]
fn test_read_input_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SAMPLE);
    assert_eq!(read_input(&input).unwrap(), SAMPLE);
}

#[test]
fn test_read_input_missing_file() {
    let err = read_input(Path::new("/nonexistent/input.json")).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn test_display_input_stdin() {
    assert_eq!(display_input(Path::new("-")), "<stdin>");
    assert_eq!(display_input(Path::new("data.json")), "data.json");
}

// =========================================================================
// Command Tests
// =========================================================================

#[test]
fn test_csv_command_writes_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SAMPLE);
    let output = dir.path().join("out.csv");

    csv(input, output.clone(), true).unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
}

#[test]
fn test_xls_command_writes_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SAMPLE);
    let output = dir.path().join("out.xls");

    xls(input, output.clone(), false).unwrap();
    assert!(output.exists());
}

#[test]
fn test_export_command_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SAMPLE);
    let output = dir.path().join("out.xlsx");

    let err = export(input, output.clone(), false).unwrap_err();
    assert!(err.is_format());
    assert!(!output.exists());
}

#[test]
fn test_export_then_inspect() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, SAMPLE);
    let output = dir.path().join("out.xls");

    export(input, output.clone(), false).unwrap();
    inspect(output).unwrap();
}

#[test]
fn test_xls_command_bad_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "not json");
    let output = dir.path().join("out.xls");

    let err = xls(input, output.clone(), false).unwrap_err();
    assert!(err.is_format());
    assert!(!output.exists());
}
