//! Record to typed model mapping
//!
//! Mapping is total: absent or malformed fields fall back to defaults and
//! never produce an error. The helpers in [`coerce`] implement the shared
//! defaulting rules.

pub mod coerce;

pub use coerce::{
    field_bool, field_f64, field_i64, field_list, field_object, field_str, field_u64,
    is_sentinel, NOT_DEFINED,
};

use crate::types::{JsonObject, JsonValue, Record};

/// A caller-facing entity built from one normalized record
pub trait Model: Sized {
    /// Build the model from a record, defaulting what is absent
    fn from_record(record: &Record) -> Self;

    /// Fields accepted by write endpoints, absent values omitted
    fn to_wire(&self) -> JsonObject;

    /// Map every record in order
    fn from_records(records: &[Record]) -> Vec<Self> {
        records.iter().map(Self::from_record).collect()
    }
}

/// Builder for wire payloads that skips absent values
#[derive(Debug, Default)]
pub struct WireObject {
    fields: JsonObject,
}

impl WireObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always include the field
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Include the field when present and non-empty
    #[must_use]
    pub fn opt_str(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }

    /// Include a non-empty string
    #[must_use]
    pub fn str_nonempty(self, key: &str, value: &str) -> Self {
        self.opt_str(key, Some(value))
    }

    /// Include a non-zero id
    #[must_use]
    pub fn id(mut self, key: &str, value: i64) -> Self {
        if value != 0 {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }

    /// Include a non-zero number
    #[must_use]
    pub fn nonzero(mut self, key: &str, value: f64) -> Self {
        if value != 0.0 {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }

    /// Include the object when it has entries
    #[must_use]
    pub fn object_nonempty(mut self, key: &str, value: &JsonObject) -> Self {
        if !value.is_empty() {
            self.fields
                .insert(key.to_string(), JsonValue::Object(value.clone()));
        }
        self
    }

    /// Include the list when it has entries
    #[must_use]
    pub fn list_nonempty(mut self, key: &str, value: Vec<JsonValue>) -> Self {
        if !value.is_empty() {
            self.fields.insert(key.to_string(), JsonValue::Array(value));
        }
        self
    }

    pub fn build(self) -> JsonObject {
        self.fields
    }
}
