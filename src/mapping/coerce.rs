//! Field coercion helpers
//!
//! Strings meaning "absent" become `None`, numbers are read from either
//! numbers or numeric strings, and anything unreadable becomes the default.

use crate::types::{JsonObject, JsonValue};

/// Placeholder one upstream API sends for unset fields
pub const NOT_DEFINED: &str = "NOT_DEFINED";

/// Whether a string stands for an absent value
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == NOT_DEFINED
}

/// Optional string field; numbers are rendered, sentinels are `None`
pub fn field_str(record: &JsonValue, key: &str) -> Option<String> {
    match record.get(key)? {
        JsonValue::String(s) if is_sentinel(s) => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer field, 0 when absent or unreadable
pub fn field_i64(record: &JsonValue, key: &str) -> i64 {
    record.get(key).map_or(0, to_i64)
}

/// Unsigned integer field, 0 when absent, negative or unreadable
pub fn field_u64(record: &JsonValue, key: &str) -> u64 {
    u64::try_from(field_i64(record, key)).unwrap_or(0)
}

/// Float field, 0.0 when absent or unreadable
pub fn field_f64(record: &JsonValue, key: &str) -> f64 {
    record.get(key).map_or(0.0, to_f64)
}

/// Boolean field; accepts booleans, 0/1 and "true"/"false" strings
pub fn field_bool(record: &JsonValue, key: &str) -> bool {
    match record.get(key) {
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(JsonValue::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    }
}

/// Array field, empty when absent or not an array
pub fn field_list<'a>(record: &'a JsonValue, key: &str) -> &'a [JsonValue] {
    record
        .get(key)
        .and_then(JsonValue::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Object field, empty when absent or not an object
pub fn field_object(record: &JsonValue, key: &str) -> JsonObject {
    record
        .get(key)
        .and_then(JsonValue::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Read an integer from a number or numeric string
pub fn to_i64(value: &JsonValue) -> i64 {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Read a float from a number or numeric string
pub fn to_f64(value: &JsonValue) -> f64 {
    match value {
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}
