//! Tests for schema module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

const FIELDS: &[Field] = &[
    field("id", FieldType::Integer),
    field("modified", FieldType::DateTime),
    field("tags", FieldType::Array(&FieldType::String)),
    field("points_amount", FieldType::Number),
];

#[test]
fn test_json_type_or_array_nullable() {
    let t = JsonTypeOrArray::nullable(JsonType::Integer);
    assert!(t.is_nullable());
    assert_eq!(t.primary_type(), Some(&JsonType::Integer));

    let single = JsonTypeOrArray::Single(JsonType::String);
    assert!(!single.is_nullable());
}

#[test]
fn test_field_type_to_property() {
    let dt = FieldType::DateTime.to_property();
    assert_eq!(dt.format.as_deref(), Some("date-time"));
    assert_eq!(dt.json_type, JsonTypeOrArray::Single(JsonType::String));

    let arr = FieldType::Array(&FieldType::Integer).to_property();
    assert_eq!(arr.json_type, JsonTypeOrArray::Single(JsonType::Array));
    assert_eq!(
        arr.items.unwrap().json_type,
        JsonTypeOrArray::Single(JsonType::Integer)
    );
}

#[test]
fn test_build_schema_keys_required() {
    let schema = build_schema(FIELDS, &["id"]);

    assert!(schema.is_required("id"));
    assert!(!schema.is_required("modified"));
    assert!(!schema.get_property("id").unwrap().is_nullable());
    assert!(schema.get_property("modified").unwrap().is_nullable());
    assert_eq!(schema.properties.len(), 4);
}

#[test]
fn test_schema_serialization() {
    let schema = build_schema(&FIELDS[..2], &["id"]);

    assert_eq!(
        schema.to_json(),
        json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "modified": {"type": ["string", "null"], "format": "date-time"}
            },
            "required": ["id"],
            "additionalProperties": true
        })
    );
}
