//! Raw HTTP responses
//!
//! Status, headers and body bytes exactly as received. Decoding to JSON is
//! left to the caller.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// One HTTP response
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Body bytes
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response with a status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Create a response whose body is the serialized JSON value
    pub fn json_body(status: u16, value: &JsonValue) -> Self {
        Self::new(status, value.to_string())
    }

    /// Add a header; invalid names or values are ignored
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as text (lossy UTF-8)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// An empty body decodes to `null`. A body that is not valid JSON is an
    /// API response error carrying the raw text.
    pub fn json(&self) -> Result<JsonValue> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonValue::Null);
        }
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::api_response(
                self.status,
                format!("Invalid JSON body ({e}): {}", truncate(&self.text(), 500)),
            )
        })
    }
}

/// Shorten long bodies for error messages
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
