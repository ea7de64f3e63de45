//! Delimited text export
//!
//! - Export: JSON array → CSV (UTF-8 with BOM, comma separated, CRLF rows)

mod exporter;

pub use exporter::{CsvExporter, UTF8_BOM};
