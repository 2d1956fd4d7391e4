//! JSON records to Arrow conversion
//!
//! The Arrow schema comes from the declared JSON Schema, never from the
//! data, so every file of a stream has the same columns. Values that do
//! not fit their column's type become nulls, except in string columns,
//! where they are stored as JSON text. A required column rejects both.

use crate::error::{Error, Result};
use crate::schema::{JsonSchema, JsonType, SchemaProperty};
use crate::types::{JsonValue, Record};
use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, StringArray};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Build an Arrow schema from a record schema
///
/// Columns follow the property order of the JSON Schema. Required
/// properties that are not nullable become non-nullable columns.
pub fn arrow_schema(schema: &JsonSchema) -> Schema {
    let fields: Vec<Field> = schema
        .properties
        .iter()
        .map(|(name, property)| {
            let nullable = property.is_nullable() || !schema.is_required(name);
            Field::new(name, data_type(property), nullable)
        })
        .collect();

    Schema::new(fields)
}

/// Arrow type for a single property
fn data_type(property: &SchemaProperty) -> DataType {
    match property.json_type.primary_type() {
        Some(JsonType::Integer) => DataType::Int64,
        Some(JsonType::Number) => DataType::Float64,
        Some(JsonType::Boolean) => DataType::Boolean,
        Some(JsonType::Array) => {
            let item = property
                .items
                .as_deref()
                .map_or(DataType::Utf8, data_type);
            DataType::List(Arc::new(Field::new("item", item, true)))
        }
        // Strings, date-times and nested objects are stored as text
        _ => DataType::Utf8,
    }
}

/// Convert records to a RecordBatch with the given schema
pub fn records_to_batch(records: &[Record], schema: &SchemaRef) -> Result<RecordBatch> {
    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::clone(schema)));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&JsonValue>> = records
            .iter()
            .map(|record| record.get(field.name()).filter(|v| !v.is_null()))
            .collect();

        if !field.is_nullable() {
            if let Some(row) = values.iter().position(Option::is_none) {
                return Err(Error::output(format!(
                    "Required column '{}' is missing in row {row}",
                    field.name()
                )));
            }
        }

        let array = build_array(&values, field.data_type())?;

        if !field.is_nullable() {
            if let Some(row) = (0..array.len()).find(|&row| array.is_null(row)) {
                let value = values[row].map(ToString::to_string).unwrap_or_default();
                return Err(Error::output(format!(
                    "Required column '{}' expects {} but row {row} has {value}",
                    field.name(),
                    field.data_type()
                )));
            }
        }

        columns.push(array);
    }

    RecordBatch::try_new(Arc::clone(schema), columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&JsonValue>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = values
                .iter()
                .map(|v| v.and_then(JsonValue::as_bool))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values
                .iter()
                .map(|v| v.and_then(JsonValue::as_i64))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = values
                .iter()
                .map(|v| v.and_then(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64))))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        _ => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        JsonValue::String(s) => s.clone(),
                        _ => v.to_string(),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }
    }
}

/// Build a list array from JSON arrays
fn build_list_array(values: &[Option<&JsonValue>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&JsonValue>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];

    for value in values {
        if let Some(JsonValue::Array(arr)) = value {
            all_items.extend(arr.iter().map(Some));
        }
        // Both array and non-array cases need an offset
        let offset = i32::try_from(all_items.len())
            .map_err(|_| Error::output("Array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let offset_buffer = OffsetBuffer::new(offsets.into());

    let list_array = ListArray::new(Arc::clone(field), offset_buffer, items_array, None);
    Ok(Arc::new(list_array))
}
