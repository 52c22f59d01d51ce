//! Authentication module
//!
//! Supports: API key pair in headers, key pair in the query string, Basic,
//! and Bearer token.
//!
//! The placement is decided once, when the connector is configured; the
//! `Authenticator` then applies the same credentials to every request.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, AuthPlacement};

#[cfg(test)]
mod tests;
