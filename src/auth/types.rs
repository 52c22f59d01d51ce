//! Auth configuration types
//!
//! These types represent the runtime auth configuration after the
//! connector settings have been validated.

use serde::{Deserialize, Serialize};

/// Header carrying the API key for header-pair auth
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Header carrying the API secret for header-pair auth
pub const API_SECRET_HEADER: &str = "X-API-Secret";

/// Query parameter carrying the consumer key for query-string auth
pub const CONSUMER_KEY_PARAM: &str = "consumer_key";

/// Query parameter carrying the consumer secret for query-string auth
pub const CONSUMER_SECRET_PARAM: &str = "consumer_secret";

/// Where a key/secret pair travels on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPlacement {
    /// Two custom headers
    #[default]
    Headers,
    /// Two query-string parameters
    QueryString,
    /// HTTP Basic authentication
    Basic,
}

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Key and secret sent as two request headers
    HeaderPair {
        /// Header name for the key
        key_header: String,
        /// Header name for the secret
        secret_header: String,
        /// The API key
        key: String,
        /// The API secret
        secret: String,
    },

    /// Key and secret sent as query-string parameters
    QueryPair {
        /// Parameter name for the key
        key_param: String,
        /// Parameter name for the secret
        secret_param: String,
        /// The consumer key
        key: String,
        /// The consumer secret
        secret: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// Build the auth config for a key/secret pair at the given placement
    pub fn key_pair(
        placement: AuthPlacement,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let secret = secret.into();
        match placement {
            AuthPlacement::Headers => Self::HeaderPair {
                key_header: API_KEY_HEADER.to_string(),
                secret_header: API_SECRET_HEADER.to_string(),
                key,
                secret,
            },
            AuthPlacement::QueryString => Self::QueryPair {
                key_param: CONSUMER_KEY_PARAM.to_string(),
                secret_param: CONSUMER_SECRET_PARAM.to_string(),
                key,
                secret,
            },
            AuthPlacement::Basic => Self::Basic {
                username: key,
                password: secret,
            },
        }
    }

    /// Build a bearer-token auth config
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }
}

// Secrets never reach log output.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::HeaderPair {
                key_header,
                secret_header,
                ..
            } => f
                .debug_struct("HeaderPair")
                .field("key_header", key_header)
                .field("secret_header", secret_header)
                .finish_non_exhaustive(),
            Self::QueryPair {
                key_param,
                secret_param,
                ..
            } => f
                .debug_struct("QueryPair")
                .field("key_param", key_param)
                .field("secret_param", secret_param)
                .finish_non_exhaustive(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}
