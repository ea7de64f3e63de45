//! Read an exported .xls back with calamine

use crate::error::{TabularError, TabularResult};
use calamine::{open_workbook, Data, Range, Reader, Xls};
use std::path::{Path, PathBuf};

/// Shape of one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub header: Vec<String>,
    /// Every row as text, header included
    pub cells: Vec<Vec<String>>,
}

/// Workbook reader for files written by [`super::SpreadsheetExporter`]
pub struct XlsInspector {
    path: PathBuf,
}

impl XlsInspector {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Summarize every sheet in the workbook
    pub fn inspect(&self) -> TabularResult<Vec<SheetSummary>> {
        let mut workbook: Xls<_> = open_workbook(&self.path)
            .map_err(|e| TabularError::export_with("Failed to open Excel file", e))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut summaries = Vec::with_capacity(sheet_names.len());

        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
                TabularError::export_with(format!("Failed to read sheet '{}'", sheet_name), e)
            })?;
            summaries.push(summarize_sheet(&sheet_name, &range));
        }

        Ok(summaries)
    }
}

fn summarize_sheet(name: &str, range: &Range<Data>) -> SheetSummary {
    let (rows, columns) = range.get_size();
    let cells: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    let header = cells.first().cloned().unwrap_or_default();

    SheetSummary {
        name: name.to_string(),
        rows,
        columns,
        header,
        cells,
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("x".to_string())), "x");
        assert_eq!(cell_to_string(&Data::Int(3)), "3");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_inspect_missing_file() {
        let err = XlsInspector::new("/nonexistent/file.xls")
            .inspect()
            .unwrap_err();
        assert!(err.is_export());
    }
}
