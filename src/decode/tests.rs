//! Tests for decoder module

use super::*;
use crate::error::Error;
use serde_json::json;
use test_case::test_case;

#[test]
fn test_decode_rows_in_order() {
    let rows = JsonDecoder::new()
        .decode(r#"[{"id": 5, "slug": "a"}, {"id": 9}, {"id": 2}]"#)
        .unwrap();

    let ids: Vec<_> = rows.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(5), json!(9), json!(2)]);
    assert_eq!(rows[0]["slug"], json!("a"));
}

#[test]
fn test_decode_empty_array() {
    assert!(JsonDecoder::new().decode("[]").unwrap().is_empty());
}

#[test]
fn test_decode_keeps_nested_values() {
    let rows = JsonDecoder::new()
        .decode(r#"[{"title": {"rendered": "Intro"}, "tags": [1, 2]}]"#)
        .unwrap();
    assert_eq!(rows[0]["title"], json!({"rendered": "Intro"}));
    assert_eq!(rows[0]["tags"], json!([1, 2]));
}

#[test_case("not json" ; "garbage")]
#[test_case("" ; "empty body")]
#[test_case(r#"{"code": "rest_forbidden"}"# ; "error object")]
#[test_case("[1, 2]" ; "array of scalars")]
#[test_case(r#"[{"id": 1}, null]"# ; "null row")]
#[test_case("42" ; "number")]
fn test_decode_rejects(body: &str) {
    let err = JsonDecoder::new().decode(body).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{err}");
}

#[test]
fn test_decode_error_names_offending_row() {
    let err = JsonDecoder::new()
        .decode(r#"[{"id": 1}, "oops"]"#)
        .unwrap_err();
    assert!(err.to_string().contains("row 1 is a string"));
}
