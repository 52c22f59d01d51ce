//! Common types used throughout vendorlink
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One normalized entity before typed mapping
pub type Record = JsonValue;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Same delay every time
    Constant,
    /// Delay grows linearly with the attempt number
    Linear,
    /// Delay doubles each attempt
    #[default]
    Exponential,
}

// ============================================================================
// Vendor
// ============================================================================

/// Which upstream platform a connector talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// Messaging/CRM platform (people, products, orders, template categories)
    #[default]
    Crm,
    /// E-commerce platform (products, categories, customers, orders)
    Shop,
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vendor::Crm => f.write_str("crm"),
            Vendor::Shop => f.write_str("shop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::GET), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(Method::PUT), reqwest::Method::PUT);
        assert_eq!(Method::DELETE.to_string(), "DELETE");
    }

    #[test]
    fn test_vendor_serde() {
        let vendor: Vendor = serde_yaml::from_str("shop").unwrap();
        assert_eq!(vendor, Vendor::Shop);
        assert_eq!(Vendor::default(), Vendor::Crm);
    }

    #[test]
    fn test_backoff_default() {
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
