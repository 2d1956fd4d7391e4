//! Declared field tables
//!
//! Resource schemas are static data: a slice of [`Field`]s per resource,
//! turned into a [`JsonSchema`] for discovery and `SCHEMA` messages.

use super::types::{JsonSchema, JsonType, SchemaProperty};

/// Declared type of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Number,
    Boolean,
    String,
    /// RFC 3339 string
    DateTime,
    /// Free-form nested object
    Object,
    /// Homogeneous array of the given item type
    Array(&'static FieldType),
}

impl FieldType {
    /// Build the JSON Schema property for this type
    pub fn to_property(self) -> SchemaProperty {
        match self {
            FieldType::Integer => SchemaProperty::new(JsonType::Integer),
            FieldType::Number => SchemaProperty::new(JsonType::Number),
            FieldType::Boolean => SchemaProperty::new(JsonType::Boolean),
            FieldType::String => SchemaProperty::new(JsonType::String),
            FieldType::DateTime => SchemaProperty::new(JsonType::String).with_format("date-time"),
            FieldType::Object => SchemaProperty::new(JsonType::Object),
            FieldType::Array(item) => SchemaProperty::array(item.to_property()),
        }
    }
}

/// A named field in a resource schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub field_type: FieldType,
}

/// Shorthand constructor for field tables
pub const fn field(name: &'static str, field_type: FieldType) -> Field {
    Field { name, field_type }
}

/// Build the record schema for a resource
///
/// Key fields are required and non-nullable; every other field is nullable.
pub fn build_schema(fields: &[Field], key_fields: &[&str]) -> JsonSchema {
    let mut schema = JsonSchema::new();
    for f in fields {
        let property = f.field_type.to_property();
        if key_fields.contains(&f.name) {
            schema.add_property(f.name, property);
            schema.add_required(f.name);
        } else {
            schema.add_property(f.name, property.into_nullable());
        }
    }
    schema
}
