//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON Schema type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

/// `"type"` keyword: one type, or `[type, "null"]` for optional fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonTypeOrArray {
    Single(JsonType),
    Multiple(Vec<JsonType>),
}

impl JsonTypeOrArray {
    /// `[t, "null"]`
    pub fn nullable(t: JsonType) -> Self {
        match t {
            JsonType::Null => Self::Single(JsonType::Null),
            t => Self::Multiple(vec![t, JsonType::Null]),
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Single(t) => *t == JsonType::Null,
            Self::Multiple(types) => types.contains(&JsonType::Null),
        }
    }

    /// The first non-null type
    pub fn primary_type(&self) -> Option<&JsonType> {
        match self {
            Self::Single(t) => Some(t),
            Self::Multiple(types) => types.iter().find(|t| **t != JsonType::Null),
        }
    }
}

/// Schema of one record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Property type(s)
    #[serde(rename = "type")]
    pub json_type: JsonTypeOrArray,

    /// Format hint (e.g., "date-time")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Array items schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,
}

impl SchemaProperty {
    pub fn new(json_type: JsonType) -> Self {
        Self {
            json_type: JsonTypeOrArray::Single(json_type),
            format: None,
            items: None,
        }
    }

    /// `{"type": "array", "items": ...}`
    pub fn array(items: SchemaProperty) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(JsonType::Array)
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Widen the type to also accept `null`
    #[must_use]
    pub fn into_nullable(self) -> Self {
        match self.json_type {
            JsonTypeOrArray::Single(t) => Self {
                json_type: JsonTypeOrArray::nullable(t),
                ..self
            },
            JsonTypeOrArray::Multiple(_) => self,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.json_type.is_nullable()
    }
}

/// Object schema of a whole record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Schema type (always "object" for top-level)
    #[serde(rename = "type")]
    pub json_type: JsonType,

    /// Object properties
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaProperty>,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Allow additional properties
    #[serde(rename = "additionalProperties", default = "default_true")]
    pub additional_properties: bool,
}

fn default_true() -> bool {
    true
}

impl Default for JsonSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSchema {
    /// Empty object schema accepting additional properties
    pub fn new() -> Self {
        Self {
            json_type: JsonType::Object,
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: true,
        }
    }

    pub fn add_property(&mut self, name: &str, property: SchemaProperty) {
        self.properties.insert(name.to_string(), property);
    }

    /// Mark a property required (idempotent)
    pub fn add_required(&mut self, name: &str) {
        if !self.required.iter().any(|n| n == name) {
            self.required.push(name.to_string());
        }
    }

    /// Check if a property is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }

    pub fn get_property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.get(name)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
