//! Flattening envelope shapes into record lists

use super::shape::{is_falsy, EnvelopeShape};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use tracing::{debug, warn};

/// Records extracted from one body, with the shape they came from
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Records in envelope order
    pub records: Vec<Record>,
    /// Name of the matched shape
    pub shape: &'static str,
}

impl Normalized {
    /// Whether the body matched no known envelope and was wrapped whole
    pub fn is_fallback(&self) -> bool {
        self.shape == "opaque"
    }
}

/// Envelope normalizer
///
/// Strict mode rejects objects that match no known envelope instead of
/// wrapping them as a single record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvelopeNormalizer {
    strict: bool,
}

impl EnvelopeNormalizer {
    /// Create a lenient normalizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with the given strictness
    pub fn with_strict(strict: bool) -> Self {
        Self { strict }
    }

    /// Whether unknown objects are rejected
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Flatten a decoded body into an ordered record list.
    ///
    /// Fails with `ApiResponse` for error payloads, and in strict mode for
    /// objects that match no known envelope.
    pub fn normalize(&self, body: JsonValue, hint: Option<&str>) -> Result<Normalized> {
        let shape = EnvelopeShape::classify(body, hint);
        let name = shape.name();
        let records = self.flatten(shape, hint)?;

        debug!("Normalized {} record(s) from {} envelope", records.len(), name);
        Ok(Normalized {
            records,
            shape: name,
        })
    }

    /// Extract the one record of a single-item response.
    ///
    /// A bare object is the record itself here, not an unknown envelope.
    /// Returns `None` when the body holds no record.
    pub fn normalize_item(&self, body: JsonValue, hint: Option<&str>) -> Result<Option<Record>> {
        match EnvelopeShape::classify(body, hint) {
            EnvelopeShape::Opaque(object) => Ok(Some(JsonValue::Object(object))),
            shape => Ok(self.flatten(shape, hint)?.into_iter().next()),
        }
    }

    fn flatten(&self, shape: EnvelopeShape, hint: Option<&str>) -> Result<Vec<Record>> {
        let records = match shape {
            EnvelopeShape::Array(items) | EnvelopeShape::DataArray(items) => items,
            EnvelopeShape::WrappedArray(value)
            | EnvelopeShape::DataHinted(value)
            | EnvelopeShape::DataOpaque(value)
            | EnvelopeShape::Hinted(value)
            | EnvelopeShape::Results(value) => array_or_wrap(value),
            EnvelopeShape::Error { status, message } => {
                warn!("API returned error payload: status={status}, error={message}");
                return Err(Error::api_response(status, message));
            }
            EnvelopeShape::Opaque(object) => {
                let keys: Vec<&str> = object.keys().map(String::as_str).collect();
                if self.strict {
                    return Err(Error::api_response(
                        200,
                        format!("Unrecognized response envelope with keys {keys:?}"),
                    ));
                }
                warn!(
                    "Unrecognized response envelope (hint {:?}, keys {:?}), treating it as one record",
                    hint, keys
                );
                vec![JsonValue::Object(object)]
            }
            EnvelopeShape::Scalar => Vec::new(),
        };
        Ok(records)
    }
}

/// Normalize with the lenient policy
pub fn normalize(body: JsonValue, hint: Option<&str>) -> Result<Normalized> {
    EnvelopeNormalizer::new().normalize(body, hint)
}

/// Arrays are the list; falsy values are empty; anything else is one record
fn array_or_wrap(value: JsonValue) -> Vec<Record> {
    match value {
        JsonValue::Array(items) => items,
        other if is_falsy(&other) => Vec::new(),
        other => vec![other],
    }
}
