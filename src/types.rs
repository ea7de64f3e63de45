//! Record, header and dataset types shared by both exporters

use crate::error::{TabularError, TabularResult};
use serde::Deserialize;
use serde_json::{Map, Value};

/// One JSON object, keys kept in document order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Text of the named field, empty when the field is absent
    pub fn cell_by_name(&self, key: &str) -> String {
        self.get(key).map(cell_text).unwrap_or_default()
    }

    /// Spreadsheet text of every value in insertion order
    pub fn cells_by_position(&self) -> Vec<String> {
        self.values().map(spreadsheet_text).collect()
    }

    /// True when the keys are exactly the header columns in header order
    pub fn matches_header(&self, header: &Header) -> bool {
        self.len() == header.len() && self.keys().eq(header.iter())
    }
}

/// Ordered column names taken from the first record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    pub fn from_record(record: &Record) -> Self {
        Self {
            columns: record.keys().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Non-empty list of records with the header fixed by the first one
#[derive(Debug, Clone)]
pub struct Dataset {
    header: Header,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> TabularResult<Self> {
        let first = records
            .first()
            .ok_or_else(|| TabularError::Format("no records to export".to_string()))?;
        if first.is_empty() {
            return Err(TabularError::Format("first record has no fields".to_string()));
        }
        let header = Header::from_record(first);
        Ok(Self { header, records })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Render a JSON value as CSV cell text
///
/// Strings are written as-is, numbers and booleans in their JSON spelling,
/// null as an empty cell. Nested arrays and objects fall back to compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Render a JSON value as spreadsheet cell text
///
/// Same as [`cell_text`] except null, which is written as the text `null`.
pub fn spreadsheet_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => cell_text(other),
    }
}
