//! CSV exporter implementation

use crate::error::{TabularError, TabularResult};
use crate::parser;
use crate::types::Dataset;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 byte-order-mark written before the header row
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// CSV exporter for a JSON array of flat objects
///
/// Columns come from the first object's field names. Every row looks its
/// cells up by column name: missing fields become empty cells and fields
/// unknown to the header are dropped.
pub struct CsvExporter {
    dataset: Dataset,
}

impl CsvExporter {
    /// Parse JSON content into an exporter
    pub fn from_json(content: &str) -> TabularResult<Self> {
        Ok(Self::new(parser::parse_tree(content)?))
    }

    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Export to a .csv file, creating or truncating it
    pub fn export(&self, output_path: &Path) -> TabularResult<()> {
        tracing::debug!(path = %output_path.display(), "generate csv file begin");

        let file = File::create(output_path)?;
        let out = self.write_to(BufWriter::new(file))?;
        // Close errors surface here, not in Drop
        out.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        tracing::debug!(path = %output_path.display(), "generate csv file end");
        Ok(())
    }

    /// Write BOM, header and rows to `out`, returning the flushed writer
    pub fn write_to<W: Write>(&self, mut out: W) -> TabularResult<W> {
        out.write_all(&UTF8_BOM)?;

        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(out);

        let header = self.dataset.header();
        writer.write_record(header.iter())?;

        for record in self.dataset.records() {
            writer.write_record(header.iter().map(|column| record.cell_by_name(column)))?;
        }

        writer.flush()?;
        let mut out = writer
            .into_inner()
            .map_err(|e| TabularError::Io(e.into_error()))?;
        out.flush()?;
        Ok(out)
    }
}
