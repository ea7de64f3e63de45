//! Excel exporter implementation - JSON records → legacy .xls

use super::workbook::Workbook;
use super::{COLUMN_WIDTH_SCALE, HEADER_ROW_HEIGHT, SHEET_NAME};
use crate::error::TabularResult;
use crate::parser;
use crate::types::Dataset;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Spreadsheet exporter for a JSON array of ordered objects
pub struct SpreadsheetExporter {
    dataset: Dataset,
}

impl SpreadsheetExporter {
    /// Parse JSON content into an exporter
    pub fn from_json(content: &str) -> TabularResult<Self> {
        Ok(Self::new(parser::parse_records(content)?))
    }

    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Build the one-sheet workbook
    ///
    /// Body cells are placed by each record's own value order, not looked up
    /// by header name. A record whose keys differ from the header still fills
    /// columns 0..len in its own order; such records are logged, not reordered.
    pub fn build(&self) -> TabularResult<Workbook> {
        let header = self.dataset.header();
        let mut workbook = Workbook::new(SHEET_NAME);
        let sheet = workbook.sheet_mut();

        tracing::debug!("setting excel headers begin");
        sheet.push_row(HEADER_ROW_HEIGHT, header.columns().to_vec())?;
        tracing::debug!("setting excel headers end");

        tracing::debug!("setting excel body begin");
        for (idx, record) in self.dataset.records().iter().enumerate() {
            if !record.matches_header(header) {
                tracing::warn!(
                    row = idx + 1,
                    "record keys differ from the header, values are placed by position"
                );
            }
            sheet.push_row(HEADER_ROW_HEIGHT, record.cells_by_position())?;
        }
        tracing::debug!("setting excel body end");

        for (col, label) in header.iter().enumerate() {
            sheet.set_column_width(col, column_width(label))?;
        }

        Ok(workbook)
    }

    /// Export to an .xls file, creating or truncating it
    pub fn export(&self, output_path: &Path) -> TabularResult<()> {
        tracing::debug!(path = %output_path.display(), "generate excel file begin");

        // Serialize before touching the destination
        let bytes = self.build()?.to_bytes()?;

        let mut out = BufWriter::new(File::create(output_path)?);
        out.write_all(&bytes)?;
        out.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        tracing::debug!(
            path = %output_path.display(),
            bytes = bytes.len(),
            "generate excel file end"
        );
        Ok(())
    }
}

/// Header label length × scale, in 1/256 of a character
pub fn column_width(label: &str) -> u32 {
    label.chars().count() as u32 * COLUMN_WIDTH_SCALE
}
