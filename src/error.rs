//! Error types for vendorlink
//!
//! Every pipeline failure is one of six kinds. The classifier in
//! [`crate::http`] is the only place that turns an HTTP status or a
//! transport failure into an [`Error`]; everything above it propagates
//! the value unchanged.

use thiserror::Error;

/// Fallback `Retry-After` value (seconds) when a 429 carries no header
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// The main error type for vendorlink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Credentials were rejected (401/403)
    #[error("Authentication failed with status {status}: {message}")]
    Authentication { status: u16, message: String },

    /// The requested resource does not exist (404)
    #[error("{}", not_found_message(.resource, .id))]
    NotFound {
        resource: String,
        id: Option<String>,
    },

    /// Too many requests (429)
    #[error("Rate limit exceeded, retry after {retry_after_seconds}s")]
    RateLimit { retry_after_seconds: u64 },

    /// Any other non-success response, including error payloads sent with 200
    #[error("API error {status}: {body}")]
    ApiResponse { status: u16, body: String },

    /// Timeout or connection-level failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// Missing or invalid settings, raised before any request is made
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Field-less mirror of [`Error`] for callers that only branch on the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    NotFound,
    RateLimit,
    ApiResponse,
    Network,
    Configuration,
}

fn not_found_message(resource: &str, id: &Option<String>) -> String {
    match id {
        Some(id) if !id.is_empty() => format!("{resource} with ID {id} not found"),
        _ => format!("{resource} not found"),
    }
}

impl Error {
    /// Create an authentication error
    pub fn authentication(status: u16, message: impl Into<String>) -> Self {
        Self::Authentication {
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error for a resource without an id
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: None,
        }
    }

    /// Create a not-found error for a specific resource id
    pub fn not_found_id(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: Some(id.to_string()),
        }
    }

    /// Create an API response error
    pub fn api_response(status: u16, body: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            body: body.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::ApiResponse { .. } => ErrorKind::ApiResponse,
            Self::Network { .. } => ErrorKind::Network,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::ApiResponse { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Network { .. } | Self::Configuration { .. } => None,
        }
    }
}

impl ErrorKind {
    /// Short guidance for presentation layers
    pub fn hint(self) -> &'static str {
        match self {
            Self::Authentication => "check the API credentials",
            Self::NotFound => "the requested record does not exist",
            Self::RateLimit => "too many requests, try again later",
            Self::ApiResponse => "the API rejected the request",
            Self::Network => "check the network connection and the API URL",
            Self::Configuration => "the connector is not configured",
        }
    }
}

/// Result type alias for vendorlink
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("base_url is required");
        assert_eq!(
            err.to_string(),
            "Configuration error: base_url is required"
        );

        let err = Error::api_response(503, "Service Unavailable");
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = Error::RateLimit {
            retry_after_seconds: 30,
        };
        assert_eq!(err.to_string(), "Rate limit exceeded, retry after 30s");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            Error::not_found_id("Client", 123).to_string(),
            "Client with ID 123 not found"
        );
        assert_eq!(
            Error::not_found("Products endpoint").to_string(),
            "Products endpoint not found"
        );
        assert_eq!(
            Error::NotFound {
                resource: "Order".into(),
                id: Some(String::new())
            }
            .to_string(),
            "Order not found"
        );
    }

    #[test]
    fn test_kind_and_status() {
        assert_eq!(
            Error::authentication(403, "forbidden").kind(),
            ErrorKind::Authentication
        );
        assert_eq!(Error::not_found("x").status(), Some(404));
        assert_eq!(Error::network("timeout").status(), None);
        assert_eq!(Error::api_response(500, "").status(), Some(500));
    }

    #[test]
    fn test_hints_are_distinct() {
        let kinds = [
            ErrorKind::Authentication,
            ErrorKind::NotFound,
            ErrorKind::RateLimit,
            ErrorKind::ApiResponse,
            ErrorKind::Network,
            ErrorKind::Configuration,
        ];
        let hints: std::collections::HashSet<_> = kinds.iter().map(|k| k.hint()).collect();
        assert_eq!(hints.len(), kinds.len());
    }
}
