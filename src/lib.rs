//! Tabular - JSON records to CSV and legacy Excel files
//!
//! This library converts a JSON array of flat objects into a table: the first
//! object's keys become the header row and every element becomes one row.
//!
//! # Features
//!
//! - CSV export: UTF-8 with byte-order-mark, comma separated, CRLF rows
//! - Excel export: one-sheet BIFF8 `.xls`, text cells, fixed row height
//! - Column order follows the JSON document, never re-sorted
//! - Read-back of written workbooks for inspection
//!
//! # Example
//!
//! ```no_run
//! use royalbit_tabular::{export_csv, export_spreadsheet};
//! use std::path::Path;
//!
//! let json = r#"[{"a":1,"b":"x"},{"a":2,"b":"y"}]"#;
//! export_csv(Path::new("report.csv"), json)?;
//! export_spreadsheet(Path::new("report.xls"), json)?;
//! # Ok::<(), royalbit_tabular::error::TabularError>(())
//! ```

pub mod cli;
pub mod delimited;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;

use std::path::Path;

// Re-export commonly used types
pub use delimited::CsvExporter;
pub use error::{TabularError, TabularResult};
pub use excel::{SpreadsheetExporter, XlsInspector};
pub use types::{Dataset, Header, Record};

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xls,
}

impl ExportFormat {
    /// Pick the format from the file extension (case insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xls" => Some(ExportFormat::Xls),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xls => "xls",
        }
    }

    pub fn export(&self, path: &Path, content: &str) -> TabularResult<()> {
        match self {
            ExportFormat::Csv => export_csv(path, content),
            ExportFormat::Xls => export_spreadsheet(path, content),
        }
    }
}

/// Write `content` (a JSON array of objects) to `path` as CSV
///
/// Nothing is written when the content fails to parse.
pub fn export_csv(path: &Path, content: &str) -> TabularResult<()> {
    CsvExporter::from_json(content)
        .and_then(|exporter| exporter.export(path))
        .inspect_err(|e| {
            tracing::error!(path = %path.display(), "generate csv file failed: {}", e);
        })
}

/// Write `content` (a JSON array of objects) to `path` as a legacy .xls workbook
///
/// Nothing is written when the content fails to parse or the workbook
/// cannot be built.
pub fn export_spreadsheet(path: &Path, content: &str) -> TabularResult<()> {
    SpreadsheetExporter::from_json(content)
        .and_then(|exporter| exporter.export(path))
        .inspect_err(|e| {
            tracing::error!(path = %path.display(), "generate excel error: {}", e);
        })
}
