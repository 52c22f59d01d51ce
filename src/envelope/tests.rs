//! Tests for envelope normalization

use super::*;
use crate::error::{Error, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn ids(records: &[Value]) -> Vec<i64> {
    records.iter().filter_map(|r| r["id"].as_i64()).collect()
}

// ============================================================================
// Documented shapes
// ============================================================================

#[test_case(json!([{"id": 1}, {"id": 2}]), "array" ; "bare array")]
#[test_case(json!([{"categories": [{"id": 1}, {"id": 2}]}]), "wrapped_array" ; "array of wrapper")]
#[test_case(json!({"data": [{"id": 1}, {"id": 2}]}), "data_array" ; "data array")]
#[test_case(json!({"data": {"categories": [{"id": 1}, {"id": 2}]}}), "data_hinted" ; "data with hint")]
#[test_case(json!({"categories": [{"id": 1}, {"id": 2}]}), "hinted" ; "hint at top level")]
#[test_case(json!({"results": [{"id": 1}, {"id": 2}], "count": 2}), "results" ; "results key")]
fn test_list_shapes(body: Value, expected_shape: &str) {
    let normalized = normalize(body, Some("categories")).unwrap();
    assert_eq!(normalized.shape, expected_shape);
    assert_eq!(ids(&normalized.records), vec![1, 2]);
    assert!(!normalized.is_fallback());
}

#[test]
fn test_unknown_object_falls_back_to_single_record() {
    let body = json!({"id": 9, "name": "Solo"});
    let normalized = normalize(body.clone(), Some("categories")).unwrap();
    assert_eq!(normalized.shape, "opaque");
    assert!(normalized.is_fallback());
    assert_eq!(normalized.records, vec![body]);
}

#[test_case(json!(null) ; "null")]
#[test_case(json!(42) ; "number")]
#[test_case(json!("text") ; "string")]
#[test_case(json!(true) ; "boolean")]
fn test_scalars_are_empty(body: Value) {
    let normalized = normalize(body, Some("people")).unwrap();
    assert_eq!(normalized.shape, "scalar");
    assert!(normalized.records.is_empty());
}

// ============================================================================
// Array-or-wrap rule
// ============================================================================

#[test_case(json!({"id": 1}), 1 ; "single object is wrapped")]
#[test_case(json!(null), 0 ; "null is empty")]
#[test_case(json!({}), 0 ; "empty object is empty")]
#[test_case(json!([]), 0 ; "empty array is empty")]
#[test_case(json!(""), 0 ; "empty string is empty")]
#[test_case(json!(0), 0 ; "zero is empty")]
#[test_case(json!(false), 0 ; "false is empty")]
fn test_wrap_rule_under_hint(value: Value, expected_len: usize) {
    let shapes = [
        json!([{ "people": value.clone() }]),
        json!({"data": { "people": value.clone() }}),
        json!({ "people": value.clone() }),
        json!({ "results": value }),
    ];
    for body in shapes {
        let normalized = normalize(body.clone(), Some("people")).unwrap();
        assert_eq!(normalized.records.len(), expected_len, "body: {body}");
    }
}

#[test]
fn test_data_object_without_hint_is_single_record() {
    let normalized = normalize(json!({"data": {"id": 5, "name": "X"}}), Some("people")).unwrap();
    assert_eq!(normalized.shape, "data_opaque");
    assert_eq!(normalized.records, vec![json!({"id": 5, "name": "X"})]);
}

#[test_case(json!({"data": null}) ; "null data")]
#[test_case(json!({"data": {}}) ; "empty data object")]
#[test_case(json!({"data": []}) ; "empty data array")]
fn test_empty_data(body: Value) {
    assert!(normalize(body, Some("people")).unwrap().records.is_empty());
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_array_without_hint_in_first_element_is_used_as_is() {
    let body = json!([{"id": 1}, {"people": [{"id": 7}]}]);
    let normalized = normalize(body, Some("people")).unwrap();
    assert_eq!(normalized.shape, "array");
    assert_eq!(normalized.records.len(), 2);
}

#[test]
fn test_array_hint_ignored_without_hint() {
    let body = json!([{"people": [{"id": 7}]}]);
    let normalized = normalize(body, None).unwrap();
    assert_eq!(normalized.shape, "array");
    assert_eq!(normalized.records.len(), 1);
}

#[test]
fn test_data_wins_over_hint_and_error() {
    let body = json!({
        "data": [{"id": 1}],
        "people": [{"id": 2}, {"id": 3}],
        "error": "ignored"
    });
    let normalized = normalize(body, Some("people")).unwrap();
    assert_eq!(ids(&normalized.records), vec![1]);
}

#[test]
fn test_hint_wins_over_results() {
    let body = json!({"results": [{"id": 1}], "people": [{"id": 2}]});
    let normalized = normalize(body, Some("people")).unwrap();
    assert_eq!(ids(&normalized.records), vec![2]);
}

#[test]
fn test_order_is_preserved() {
    let body = json!({"data": {"people": [{"id": 3}, {"id": 1}, {"id": 2}, {"id": 1}]}});
    let normalized = normalize(body, Some("people")).unwrap();
    assert_eq!(ids(&normalized.records), vec![3, 1, 2, 1]);
}

// ============================================================================
// Error payloads
// ============================================================================

#[test]
fn test_error_payload_is_failure_not_empty() {
    let err = normalize(json!({"error": "boom", "status": 0}), Some("categories")).unwrap_err();
    assert_eq!(err, Error::api_response(0, "boom"));
}

#[test_case(json!({"error": "denied", "status": 403}), 403, "denied" ; "numeric status")]
#[test_case(json!({"error": "gone", "status": "410"}), 410, "gone" ; "string status")]
#[test_case(json!({"error": {"code": 7}}), 0, "{\"code\":7}" ; "structured error")]
#[test_case(json!({"error": null}), 0, "Unknown error" ; "null error")]
fn test_error_payload_fields(body: Value, status: u16, message: &str) {
    let err = normalize(body, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiResponse);
    assert_eq!(err, Error::api_response(status, message));
}

// ============================================================================
// Strictness
// ============================================================================

#[test]
fn test_strict_mode_rejects_unknown_object() {
    let normalizer = EnvelopeNormalizer::with_strict(true);
    assert!(normalizer.is_strict());

    let err = normalizer
        .normalize(json!({"id": 1, "name": "odd"}), Some("people"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiResponse);
    assert_eq!(err.status(), Some(200));
}

#[test]
fn test_strict_mode_accepts_known_shapes() {
    let normalizer = EnvelopeNormalizer::with_strict(true);
    let normalized = normalizer
        .normalize(json!({"data": {"people": [{"id": 1}]}}), Some("people"))
        .unwrap();
    assert_eq!(ids(&normalized.records), vec![1]);
}

#[test]
fn test_is_falsy() {
    assert!(is_falsy(&json!(0.0)));
    assert!(!is_falsy(&json!(0.5)));
    assert!(!is_falsy(&json!("0")));
    assert!(!is_falsy(&json!([null])));
}

#[test]
fn test_classify_leaves_opaque_object_intact() {
    let body = json!({"b": 1, "a": 2, "c": 3});
    match EnvelopeShape::classify(body.clone(), Some("people")) {
        EnvelopeShape::Opaque(object) => assert_eq!(Value::Object(object), body),
        other => panic!("unexpected shape {}", other.name()),
    }
}

// ============================================================================
// Single items
// ============================================================================

#[test_case(json!({"id": 4, "name": "Solo"}) ; "bare object")]
#[test_case(json!({"data": {"id": 4, "name": "Solo"}}) ; "data object")]
#[test_case(json!({"data": {"people": {"id": 4, "name": "Solo"}}}) ; "data with hint")]
#[test_case(json!([{"id": 4, "name": "Solo"}]) ; "one element array")]
fn test_normalize_item(body: Value) {
    let record = EnvelopeNormalizer::with_strict(true)
        .normalize_item(body, Some("people"))
        .unwrap();
    assert_eq!(record, Some(json!({"id": 4, "name": "Solo"})));
}

#[test_case(json!(null) ; "null")]
#[test_case(json!({"data": null}) ; "null data")]
#[test_case(json!([]) ; "empty array")]
fn test_normalize_item_empty(body: Value) {
    assert_eq!(
        EnvelopeNormalizer::new().normalize_item(body, None).unwrap(),
        None
    );
}

#[test]
fn test_normalize_item_error_payload() {
    let err = EnvelopeNormalizer::new()
        .normalize_item(json!({"error": "nope", "status": 422}), None)
        .unwrap_err();
    assert_eq!(err, Error::api_response(422, "nope"));
}
