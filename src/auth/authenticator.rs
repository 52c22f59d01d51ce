//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::AuthConfig;
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// The underlying configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.config {
            AuthConfig::None => req,

            AuthConfig::HeaderPair {
                key_header,
                secret_header,
                key,
                secret,
            } => req
                .header(key_header.as_str(), key.as_str())
                .header(secret_header.as_str(), secret.as_str()),

            AuthConfig::QueryPair {
                key_param,
                secret_param,
                key,
                secret,
            } => req.query(&[
                (key_param.as_str(), key.as_str()),
                (secret_param.as_str(), secret.as_str()),
            ]),

            AuthConfig::Basic { username, password } => {
                req.basic_auth(username, Some(password))
            }

            AuthConfig::Bearer { token } => req.bearer_auth(token),
        }
    }
}
