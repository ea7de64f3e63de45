//! In-memory workbook with a single worksheet

use crate::error::{TabularError, TabularResult};

/// Rows per worksheet in a BIFF8 file
pub const MAX_ROWS: usize = 65_536;
/// Columns per worksheet in a BIFF8 file
pub const MAX_COLUMNS: usize = 256;
/// Longest cell text, in UTF-16 code units
pub const MAX_CELL_TEXT: usize = 32_767;
/// Widest column, in 1/256 of a character
pub const MAX_COLUMN_WIDTH: u32 = 255 * 256;

/// Text row with an explicit height in twips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub height: u16,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    rows: Vec<Row>,
    column_widths: Vec<Option<u16>>,
}

impl Sheet {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
            column_widths: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Append a row of text cells starting at column 0
    pub fn push_row(&mut self, height: u16, cells: Vec<String>) -> TabularResult<()> {
        if self.rows.len() >= MAX_ROWS {
            return Err(TabularError::export(format!(
                "sheet '{}' is full: at most {} rows",
                self.name, MAX_ROWS
            )));
        }
        if cells.len() > MAX_COLUMNS {
            return Err(TabularError::export(format!(
                "row {} has {} cells, at most {} columns are allowed",
                self.rows.len(),
                cells.len(),
                MAX_COLUMNS
            )));
        }
        if let Some((col, cell)) = cells
            .iter()
            .enumerate()
            .find(|(_, cell)| cell.encode_utf16().count() > MAX_CELL_TEXT)
        {
            return Err(TabularError::export(format!(
                "cell ({}, {}) holds {} characters, at most {} are allowed",
                self.rows.len(),
                col,
                cell.chars().count(),
                MAX_CELL_TEXT
            )));
        }

        self.rows.push(Row { height, cells });
        Ok(())
    }

    /// Set a column width in 1/256 of a character
    pub fn set_column_width(&mut self, col: usize, width: u32) -> TabularResult<()> {
        if col >= MAX_COLUMNS {
            return Err(TabularError::export(format!(
                "column {} is out of range (max {})",
                col,
                MAX_COLUMNS - 1
            )));
        }
        if width > MAX_COLUMN_WIDTH {
            return Err(TabularError::export(format!(
                "column {} width {} exceeds the maximum of {}",
                col, width, MAX_COLUMN_WIDTH
            )));
        }
        if self.column_widths.len() <= col {
            self.column_widths.resize(col + 1, None);
        }
        // MAX_COLUMN_WIDTH fits in u16
        self.column_widths[col] = Some(width as u16);
        Ok(())
    }

    pub fn column_width(&self, col: usize) -> Option<u16> {
        self.column_widths.get(col).copied().flatten()
    }

    /// (column, width) pairs for every column with an explicit width
    pub fn column_widths(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.column_widths
            .iter()
            .enumerate()
            .filter_map(|(col, width)| width.map(|w| (col as u16, w)))
    }

    /// Widest row, in cells
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }
}

/// Workbook holding exactly one sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    sheet: Sheet,
}

impl Workbook {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet: Sheet::new(sheet_name),
        }
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheet
    }

    /// Serialize to the bytes of an .xls file
    pub fn to_bytes(&self) -> TabularResult<Vec<u8>> {
        let stream = super::biff::workbook_stream(self);
        super::biff::compound_file(&stream)
    }
}
