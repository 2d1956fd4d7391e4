//! Tests for output module

use super::*;
use crate::context::ExtractionContext;
use crate::resources::Catalog;
use crate::schema::{build_schema, field, Field, FieldType};
use crate::state::State;
use crate::types::Record;
use arrow::array::{Array, Int64Array, ListArray, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

const INTEGERS: FieldType = FieldType::Integer;

const LESSON_FIELDS: &[Field] = &[
    field("id", FieldType::Integer),
    field("title", FieldType::Object),
    field("menu_order", FieldType::Integer),
    field("modified", FieldType::DateTime),
    field("sticky", FieldType::Boolean),
    field("score", FieldType::Number),
    field("tags", FieldType::Array(&INTEGERS)),
];

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn lesson_schema() -> crate::schema::JsonSchema {
    build_schema(LESSON_FIELDS, &["id"])
}

// ============================================================================
// Arrow Conversion Tests
// ============================================================================

#[test]
fn test_arrow_schema_types() {
    let schema = arrow_schema(&lesson_schema());

    let dtype = |name: &str| schema.field_with_name(name).unwrap().data_type().clone();
    assert_eq!(dtype("id"), DataType::Int64);
    assert_eq!(dtype("title"), DataType::Utf8);
    assert_eq!(dtype("modified"), DataType::Utf8);
    assert_eq!(dtype("sticky"), DataType::Boolean);
    assert_eq!(dtype("score"), DataType::Float64);
    assert!(matches!(dtype("tags"), DataType::List(item) if *item.data_type() == DataType::Int64));

    assert!(!schema.field_with_name("id").unwrap().is_nullable());
    assert!(schema.field_with_name("title").unwrap().is_nullable());
}

#[test]
fn test_arrow_schema_for_every_resource() {
    let catalog = Catalog::learndash();
    for resource in catalog.resources() {
        let schema = arrow_schema(&resource.schema());
        assert_eq!(schema.fields().len(), resource.fields.len(), "{}", resource.name);
    }
}

#[test]
fn test_records_to_batch() {
    let schema = Arc::new(arrow_schema(&lesson_schema()));
    let records = vec![
        record(json!({
            "id": 1,
            "title": {"rendered": "Intro"},
            "modified": "2024-01-01T00:00:00",
            "sticky": true,
            "score": 1.5,
            "tags": [3, 4]
        })),
        record(json!({"id": 2, "score": 7, "tags": []})),
    ];

    let batch = records_to_batch(&records, &schema).unwrap();
    assert_eq!(batch.num_rows(), 2);

    let ids = batch
        .column_by_name("id")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!((ids.value(0), ids.value(1)), (1, 2));

    let titles = batch
        .column_by_name("title")
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(titles.value(0), r#"{"rendered":"Intro"}"#);
    assert!(titles.is_null(1));

    let tags = batch
        .column_by_name("tags")
        .unwrap()
        .as_any()
        .downcast_ref::<ListArray>()
        .unwrap();
    assert_eq!(tags.value_length(0), 2);
    assert_eq!(tags.value_length(1), 0);
}

#[test]
fn test_mismatched_values_become_null() {
    let schema = Arc::new(arrow_schema(&lesson_schema()));
    let records = vec![record(json!({"id": 1, "menu_order": "first"}))];

    let batch = records_to_batch(&records, &schema).unwrap();
    assert!(batch.column_by_name("menu_order").unwrap().is_null(0));
}

#[test]
fn test_missing_required_column() {
    let schema = Arc::new(arrow_schema(&lesson_schema()));
    let records = vec![record(json!({"id": 1})), record(json!({"menu_order": 2}))];

    let err = records_to_batch(&records, &schema).unwrap_err();
    assert!(err.to_string().contains("'id'"));
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn test_required_column_type_mismatch() {
    let schema = Arc::new(arrow_schema(&lesson_schema()));
    let records = vec![record(json!({"id": 1})), record(json!({"id": "abc"}))];

    let err = records_to_batch(&records, &schema).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'id'"));
    assert!(message.contains("Int64"));
    assert!(message.contains("row 1"));
    assert!(message.contains("\"abc\""));
}

#[test]
fn test_empty_batch() {
    let schema = Arc::new(arrow_schema(&lesson_schema()));
    let batch = records_to_batch(&[], &schema).unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), LESSON_FIELDS.len());
}

// ============================================================================
// Message Tests
// ============================================================================

#[test]
fn test_message_wire_format() {
    let msg = Message::record("courses", record(json!({"id": 5})));
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({"type": "RECORD", "stream": "courses", "record": {"id": 5}})
    );

    let msg = Message::schema("courses", json!({"type": "object"}), &["id"]);
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({
            "type": "SCHEMA",
            "stream": "courses",
            "schema": {"type": "object"},
            "key_properties": ["id"]
        })
    );

    let msg = Message::state(State::new());
    assert_eq!(
        serde_json::to_value(&msg).unwrap(),
        json!({"type": "STATE", "value": {"bookmarks": {}}})
    );
    assert!(msg.is_state());
    assert_eq!(msg.stream(), None);
}

// ============================================================================
// Sink Tests
// ============================================================================

#[test]
fn test_json_lines_sink() {
    let mut sink = JsonLinesSink::new(Vec::new(), false);
    sink.write_schema("lessons", &lesson_schema(), &["id"]).unwrap();
    sink.write_record("lessons", &record(json!({"id": 1}))).unwrap();
    sink.write_state(&State::new()).unwrap();
    sink.finish().unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["type"], "SCHEMA");
    assert_eq!(lines[0]["key_properties"], json!(["id"]));
    assert_eq!(lines[1], json!({"type": "RECORD", "stream": "lessons", "record": {"id": 1}}));
    assert_eq!(lines[2]["type"], "STATE");
}

#[test]
fn test_json_lines_sink_pretty() {
    let mut sink = JsonLinesSink::new(Vec::new(), true);
    sink.write_record("lessons", &record(json!({"id": 1}))).unwrap();

    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert!(output.contains("\n  \"type\": \"RECORD\""));
}

#[test]
fn test_memory_sink() {
    let mut sink = MemorySink::new();
    sink.write_schema("courses", &lesson_schema(), &["id"]).unwrap();
    sink.write_record("courses", &record(json!({"id": 5}))).unwrap();
    sink.write_schema("courses_users", &lesson_schema(), &["id"]).unwrap();
    sink.write_record("courses_users", &record(json!({"id": 1, "course_id": 5})))
        .unwrap();
    sink.write_record("courses", &record(json!({"id": 9}))).unwrap();

    let mut state = State::new();
    state.advance_bookmark("courses", "modified", None, "2024-01-01T00:00:00");
    sink.write_state(&state).unwrap();
    sink.finish().unwrap();

    assert_eq!(sink.schema_streams(), vec!["courses", "courses_users"]);
    assert_eq!(sink.records("courses").len(), 2);
    assert_eq!(sink.records("courses_users")[0]["course_id"], json!(5));
    assert_eq!(sink.last_state(), Some(&state));
    assert!(sink.is_finished());
    assert_eq!(sink.messages().len(), 6);
}

#[test]
fn test_parquet_sink_writes_one_file_per_stream() {
    let dir = tempdir().unwrap();
    let mut sink = ParquetSink::new(dir.path().join("out")).unwrap();

    sink.write_schema("lessons", &lesson_schema(), &["id"]).unwrap();
    sink.write_schema("topics", &lesson_schema(), &["id"]).unwrap();
    for id in 1..=3 {
        sink.write_record("lessons", &record(json!({"id": id, "title": {"rendered": "x"}})))
            .unwrap();
    }

    let mut state = State::new();
    let ctx = ExtractionContext::empty().with("course_id", 5);
    state.advance_bookmark("lessons", "modified", Some(&ctx), "2024-01-01T00:00:00");
    sink.write_state(&state).unwrap();
    sink.finish().unwrap();

    assert_eq!(sink.rows_written().get("lessons"), Some(&3));
    assert_eq!(sink.rows_written().get("topics"), Some(&0));

    let file = std::fs::File::open(sink.stream_path("lessons")).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let rows: usize = reader.map(|batch| batch.unwrap().num_rows()).sum();
    assert_eq!(rows, 3);

    let saved: State = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("out").join("state.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(saved, state);
}

#[test]
fn test_parquet_sink_rejects_record_before_schema() {
    let dir = tempdir().unwrap();
    let mut sink = ParquetSink::new(dir.path()).unwrap();
    assert!(sink.write_record("lessons", &record(json!({"id": 1}))).is_err());
}

#[test]
fn test_parquet_writer_config() {
    let config = ParquetWriterConfig::new()
        .with_compression(parquet::basic::Compression::UNCOMPRESSED)
        .with_row_group_size(10);
    assert_eq!(config.row_group_size(), 10);
}
