//! Legacy Excel (.xls) export module
//!
//! This module converts JSON records to a BIFF8 workbook:
//! - Export: JSON array → one-sheet .xls, every cell stored as text
//! - Inspect: .xls → sheet summaries (via calamine)

mod biff;
mod exporter;
mod inspector;
mod workbook;

pub use exporter::{column_width, SpreadsheetExporter};
pub use inspector::{SheetSummary, XlsInspector};
pub use workbook::{Row, Sheet, Workbook, MAX_CELL_TEXT, MAX_COLUMNS, MAX_COLUMN_WIDTH, MAX_ROWS};

/// Name of the only worksheet
pub const SHEET_NAME: &str = "Sheet0";
/// Height of every written row, in twips
pub const HEADER_ROW_HEIGHT: u16 = 500;
/// Column width per header character, in 1/256 of a character
pub const COLUMN_WIDTH_SCALE: u32 = 800;
