//! Request descriptors
//!
//! A descriptor is an immutable description of one call: method, path
//! template, query parameters and body. Placeholders are substituted when
//! the path is rendered, and a missing value fails before dispatch.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap()
});

/// Description of a single API call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Path template, e.g. `/people/{id}`
    pub path: String,
    /// Values for the path placeholders
    pub path_params: BTreeMap<String, String>,
    /// Query parameters
    pub query: BTreeMap<String, String>,
    /// JSON body
    pub body: Option<JsonValue>,
}

impl RequestDescriptor {
    /// Create a descriptor for the given method and path template
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    /// GET descriptor
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST descriptor with a JSON body
    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        Self::new(Method::POST, path).json(body)
    }

    /// PUT descriptor with a JSON body
    pub fn put(path: impl Into<String>, body: JsonValue) -> Self {
        Self::new(Method::PUT, path).json(body)
    }

    /// DELETE descriptor
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Supply a value for a path placeholder
    #[must_use]
    pub fn path_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(key.into(), value.to_string());
        self
    }

    /// Add a query parameter, replacing any previous value for the key
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries<K, V, I>(mut self, params: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in params {
            self.query.insert(key.into(), value.to_string());
        }
        self
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Substitute every placeholder in the path template.
    ///
    /// Fails with a configuration error listing each placeholder that has
    /// no supplied value.
    pub fn render_path(&self) -> Result<String> {
        let mut missing = Vec::new();
        let rendered = PLACEHOLDER_REGEX.replace_all(&self.path, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match self.path_params.get(name) {
                Some(value) => encode_segment(value),
                None => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        });

        if missing.is_empty() {
            Ok(rendered.into_owned())
        } else {
            Err(Error::config(format!(
                "Missing value for path placeholder(s) {} in '{}'",
                missing.join(", "),
                self.path
            )))
        }
    }
}

/// Percent-encode a value for use as a single path segment
fn encode_segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
