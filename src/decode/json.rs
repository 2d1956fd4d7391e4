//! JSON array decoder

use super::RecordDecoder;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Decoder for a top-level JSON array of objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<JsonObject>> {
        let value: JsonValue = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("invalid JSON body: {e}")))?;

        let JsonValue::Array(items) = value else {
            return Err(Error::decode(format!(
                "expected a JSON array of rows, got {}",
                kind(&value)
            )));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                JsonValue::Object(row) => Ok(row),
                other => Err(Error::decode(format!(
                    "row {index} is {}, expected an object",
                    kind(&other)
                ))),
            })
            .collect()
    }
}

fn kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
