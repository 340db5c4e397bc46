//! Tests for decode module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_json_array_is_many() {
    let decoder = JsonDecoder::new();
    let page = decoder.decode(r#"[{"sha": "a"}, {"sha": "b"}]"#).unwrap();

    assert!(!page.is_single());
    assert_eq!(page.len(), 2);
    assert_eq!(
        page.into_records(),
        vec![json!({"sha": "a"}), json!({"sha": "b"})]
    );
}

#[test]
fn test_json_empty_array() {
    let page = JsonDecoder::new().decode("[]").unwrap();
    assert!(page.is_empty());
    assert_eq!(page, Page::empty());
}

#[test]
fn test_json_object_is_single() {
    let page = JsonDecoder::new()
        .decode(r#"{"full_name": "octocat/hello", "stars": 3}"#)
        .unwrap();

    assert!(page.is_single());
    assert_eq!(page.len(), 1);
    assert_eq!(
        page.into_records(),
        vec![json!({"full_name": "octocat/hello", "stars": 3})]
    );
}

#[test]
fn test_json_null_is_empty() {
    let page = JsonDecoder::new().decode("null").unwrap();
    assert!(page.is_empty());
}

#[test]
fn test_json_scalar_rejected() {
    let err = JsonDecoder::new().decode("\"rate limit\"").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("string"));
}

#[test]
fn test_json_malformed() {
    let err = JsonDecoder::new().decode("<html>").unwrap_err();
    assert!(err.is_upstream());
    assert!(err.to_string().contains("Failed to parse JSON"));
}

#[test]
fn test_json_array_elements_pass_through_unmodified() {
    let page = JsonDecoder::new().decode(r#"[1, "two", {"three": [3]}]"#).unwrap();
    assert_eq!(
        page.into_records(),
        vec![json!(1), json!("two"), json!({"three": [3]})]
    );
}

// ============================================================================
// Record paths
// ============================================================================

#[test]
fn test_json_with_path() {
    let decoder = JsonDecoder::with_path("data");
    assert_eq!(decoder.record_path(), Some("data"));

    let page = decoder
        .decode(r#"{"data": [{"customer_id": 1}, {"customer_id": 2}], "total": 2}"#)
        .unwrap();
    assert_eq!(page.len(), 2);
}

#[test]
fn test_json_with_nested_path() {
    let page = JsonDecoder::with_path("$.result.items")
        .decode(r#"{"result": {"items": [{"id": 1}]}}"#)
        .unwrap();
    assert_eq!(page.into_records(), vec![json!({"id": 1})]);
}

#[test]
fn test_json_with_array_index_path() {
    let page = JsonDecoder::with_path("pages.1")
        .decode(r#"{"pages": [[{"id": 1}], [{"id": 2}, {"id": 3}]]}"#)
        .unwrap();
    assert_eq!(page.len(), 2);
}

#[test]
fn test_json_with_missing_path() {
    let err = JsonDecoder::with_path("data")
        .decode(r#"{"error": "nope"}"#)
        .unwrap_err();

    match err {
        Error::RecordExtraction { path, .. } => assert_eq!(path, "data"),
        other => panic!("Expected RecordExtraction, got {other:?}"),
    }
}

#[test]
fn test_into_page_object_at_path() {
    let page = into_page(json!({"id": 7})).unwrap();
    assert!(page.is_single());
}
