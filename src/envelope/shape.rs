//! Envelope shape decoding

use crate::types::{JsonObject, JsonValue};

/// Generic wrapper key for record lists
pub const DATA_KEY: &str = "data";
/// Alternate generic wrapper key
pub const RESULTS_KEY: &str = "results";
/// Key that marks an error payload
pub const ERROR_KEY: &str = "error";

/// The interpretation chosen for one decoded response body.
///
/// Each variant owns the part of the body it will be flattened from.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeShape {
    /// `[record, ...]`
    Array(Vec<JsonValue>),
    /// `[{hint: ...}, ...]`, holding the value under the hint key
    WrappedArray(JsonValue),
    /// `{"data": [record, ...]}`
    DataArray(Vec<JsonValue>),
    /// `{"data": {hint: ...}}`, holding the value under the hint key
    DataHinted(JsonValue),
    /// `{"data": <anything else>}`, holding the data value
    DataOpaque(JsonValue),
    /// `{hint: ...}`
    Hinted(JsonValue),
    /// `{"results": ...}`
    Results(JsonValue),
    /// `{"error": ..., "status": ...}`
    Error { status: u16, message: String },
    /// An object matching no known envelope
    Opaque(JsonObject),
    /// null, boolean, number or string
    Scalar,
}

impl EnvelopeShape {
    /// Decode a body into its shape using the record hint
    pub fn classify(body: JsonValue, hint: Option<&str>) -> Self {
        match body {
            JsonValue::Array(items) => classify_array(items, hint),
            JsonValue::Object(object) => classify_object(object, hint),
            _ => Self::Scalar,
        }
    }

    /// Short variant name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Array(_) => "array",
            Self::WrappedArray(_) => "wrapped_array",
            Self::DataArray(_) => "data_array",
            Self::DataHinted(_) => "data_hinted",
            Self::DataOpaque(_) => "data_opaque",
            Self::Hinted(_) => "hinted",
            Self::Results(_) => "results",
            Self::Error { .. } => "error",
            Self::Opaque(_) => "opaque",
            Self::Scalar => "scalar",
        }
    }
}

fn classify_array(mut items: Vec<JsonValue>, hint: Option<&str>) -> EnvelopeShape {
    if let Some(hint) = hint {
        let wrapped = items
            .first_mut()
            .and_then(JsonValue::as_object_mut)
            .and_then(|first| first.remove(hint));
        if let Some(inner) = wrapped {
            return EnvelopeShape::WrappedArray(inner);
        }
    }
    EnvelopeShape::Array(items)
}

fn classify_object(mut object: JsonObject, hint: Option<&str>) -> EnvelopeShape {
    if let Some(data) = object.remove(DATA_KEY) {
        return match data {
            JsonValue::Array(items) => EnvelopeShape::DataArray(items),
            JsonValue::Object(mut inner) => match hint.and_then(|h| inner.remove(h)) {
                Some(hinted) => EnvelopeShape::DataHinted(hinted),
                None => EnvelopeShape::DataOpaque(JsonValue::Object(inner)),
            },
            other => EnvelopeShape::DataOpaque(other),
        };
    }

    if let Some(hinted) = hint.and_then(|h| object.remove(h)) {
        return EnvelopeShape::Hinted(hinted);
    }

    if let Some(results) = object.remove(RESULTS_KEY) {
        return EnvelopeShape::Results(results);
    }

    if let Some(error) = object.get(ERROR_KEY) {
        let message = match error {
            JsonValue::String(text) => text.clone(),
            JsonValue::Null => "Unknown error".to_string(),
            other => other.to_string(),
        };
        return EnvelopeShape::Error {
            status: status_field(object.get("status")),
            message,
        };
    }

    EnvelopeShape::Opaque(object)
}

/// Numeric status from an error payload; 0 when missing or unreadable
fn status_field(value: Option<&JsonValue>) -> u16 {
    match value {
        Some(JsonValue::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()).unwrap_or(0),
        Some(JsonValue::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Whether a value counts as empty: null, false, 0, "", [] or {}
pub fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}
