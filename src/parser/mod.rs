//! JSON input parsing
//!
//! Two entry points, one per exporter:
//! - [`parse_tree`] walks a generic `serde_json::Value` tree (CSV export)
//! - [`parse_records`] deserializes straight into ordered [`Record`]s (XLS export)
//!
//! Both reject empty input with [`TabularError::Format`] and keep object keys in
//! document order (`serde_json` is built with `preserve_order`).

use crate::error::{summarize, TabularError, TabularResult};
use crate::types::{Dataset, Record};
use serde_json::Value;

/// Parse a JSON array of objects through the generic value tree
pub fn parse_tree(content: &str) -> TabularResult<Dataset> {
    let root: Value = serde_json::from_str(content).map_err(|e| {
        tracing::error!(content = %summarize(content), "json format incorrect: {}", e);
        TabularError::Format(format!("json format incorrect: {}", e))
    })?;

    let elements = match root {
        Value::Array(elements) => elements,
        other => {
            return Err(TabularError::Format(format!(
                "expected a JSON array, found {}",
                value_kind(&other)
            )))
        }
    };

    if elements.is_empty() {
        return Err(TabularError::Format("no records to export".to_string()));
    }

    let records = elements
        .into_iter()
        .enumerate()
        .map(|(idx, element)| match element {
            Value::Object(fields) => Ok(Record::from_map(fields)),
            other => Err(TabularError::Format(format!(
                "element {} is {}, expected an object",
                idx,
                value_kind(&other)
            ))),
        })
        .collect::<TabularResult<Vec<_>>>()?;

    Dataset::new(records)
}

/// Parse a JSON array straight into ordered records
///
/// A top-level `null` is treated like an empty list.
pub fn parse_records(content: &str) -> TabularResult<Dataset> {
    let records: Option<Vec<Record>> = serde_json::from_str(content).map_err(|e| {
        tracing::error!(content = %summarize(content), "json format incorrect: {}", e);
        TabularError::Format(format!("json format incorrect: {}", e))
    })?;

    match records {
        Some(records) if !records.is_empty() => {
            tracing::info!(records = records.len(), "parsed records");
            Dataset::new(records)
        }
        _ => {
            tracing::error!("record list is null or empty");
            Err(TabularError::Format("no records to export".to_string()))
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
