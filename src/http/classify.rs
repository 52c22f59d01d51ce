//! Error classification
//!
//! The single place that decides which [`Error`] kind a response status or
//! a transport failure maps to.

use super::response::{truncate, RawResponse};
use crate::error::{Error, Result, DEFAULT_RETRY_AFTER_SECS};
use reqwest::header::HeaderMap;
use std::time::Duration;

/// What a request was about, used for not-found messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef<'a> {
    /// Human name of the resource, e.g. "Client"
    pub name: &'a str,
    /// Identifier when the request targeted one record
    pub id: Option<&'a str>,
}

impl<'a> ResourceRef<'a> {
    /// Reference to a collection or an unnamed endpoint
    pub fn collection(name: &'a str) -> Self {
        Self { name, id: None }
    }

    /// Reference to a single record
    pub fn item(name: &'a str, id: &'a str) -> Self {
        Self { name, id: Some(id) }
    }
}

/// Pass successful responses through and turn the rest into errors
pub fn check_response(response: RawResponse, resource: &ResourceRef<'_>) -> Result<RawResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(classify_response(&response, resource))
    }
}

/// Map a non-success response to its error kind.
///
/// 401/403 are authentication failures, 404 is not-found, 429 is a rate
/// limit carrying the `Retry-After` seconds, and anything else is an API
/// response error with the body text.
pub fn classify_response(response: &RawResponse, resource: &ResourceRef<'_>) -> Error {
    let status = response.status;
    let body = truncate(&response.text(), 1000);
    match status {
        401 | 403 => {
            let message = if body.trim().is_empty() {
                "Invalid API credentials".to_string()
            } else {
                body
            };
            Error::authentication(status, message)
        }
        404 => Error::NotFound {
            resource: resource.name.to_string(),
            id: resource.id.map(str::to_string),
        },
        429 => Error::RateLimit {
            retry_after_seconds: retry_after_seconds(&response.headers),
        },
        _ => Error::api_response(status, body),
    }
}

/// Seconds from the `Retry-After` header, defaulting to 60
pub fn retry_after_seconds(headers: &HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Map a failure that produced no response to a network error
pub fn classify_transport_error(err: &reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::network(format!("Request timed out after {}s", timeout.as_secs_f64()))
    } else if err.is_connect() {
        Error::network(format!("Connection failed: {err}"))
    } else if err.is_builder() {
        Error::config(format!("Invalid request: {err}"))
    } else {
        Error::network(err.to_string())
    }
}
