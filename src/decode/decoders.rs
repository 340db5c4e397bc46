//! JSON decoder

use super::types::{Page, RecordDecoder};
use crate::error::{Error, Result};
use serde_json::Value;

/// JSON decoder with optional record path extraction
///
/// Without a path the whole body is the page. With a dot-separated path
/// (e.g. `data` or `result.items`) the page is the value found there, and
/// a missing path is an error.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// The configured record path, if any
    pub fn record_path(&self) -> Option<&str> {
        self.record_path.as_deref()
    }

    fn select(&self, value: Value) -> Result<Value> {
        let Some(path) = &self.record_path else {
            return Ok(value);
        };

        extract_simple_path(value, path).ok_or_else(|| Error::RecordExtraction {
            path: path.clone(),
            message: "path not found in response".to_string(),
        })
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Page> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;

        into_page(self.select(value)?)
    }
}

/// Classify a JSON value as a page
pub fn into_page(value: Value) -> Result<Page> {
    match value {
        Value::Array(records) => Ok(Page::Many(records)),
        Value::Object(_) => Ok(Page::Single(value)),
        Value::Null => Ok(Page::empty()),
        other => Err(Error::decode(format!(
            "Expected a JSON array or object, got {}",
            type_name(&other)
        ))),
    }
}

/// Walk a dot-separated path through nested objects (and numeric array indices)
fn extract_simple_path(value: Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;

    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = match current {
            Value::Object(mut map) => map.remove(part)?,
            Value::Array(mut items) => {
                let index: usize = part.parse().ok()?;
                if index >= items.len() {
                    return None;
                }
                items.swap_remove(index)
            }
            _ => return None,
        };
    }

    Some(current)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
