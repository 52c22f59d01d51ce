//! Connector configuration
//!
//! A [`ConnectorConfig`] is loaded from YAML or from environment variables
//! named by the vendor's [`VendorPreset`], validated once, and then turned
//! into the HTTP client and authentication settings.

use crate::auth::{AuthConfig, AuthPlacement};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, DEFAULT_RETRY_STATUSES};
use crate::types::{BackoffType, Vendor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Vendor Presets
// ============================================================================

/// Environment variable names and defaults for one vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorPreset {
    /// Vendor the preset belongs to
    pub vendor: Vendor,
    /// Base URL variable
    pub url_var: &'static str,
    /// Base URL used when the variable is unset
    pub default_url: Option<&'static str>,
    /// API key (or consumer key) variable
    pub key_var: &'static str,
    /// API secret (or consumer secret) variable
    pub secret_var: &'static str,
    /// Bearer token variable
    pub token_var: Option<&'static str>,
    /// API version variable
    pub version_var: &'static str,
    /// Timeout variable (seconds)
    pub timeout_var: &'static str,
    /// Attempt bound variable
    pub retries_var: Option<&'static str>,
    /// Retry delay variable (seconds)
    pub retry_delay_var: Option<&'static str>,
    /// Page size variable
    pub page_size_var: Option<&'static str>,
    /// Variable choosing query-string over Basic credentials
    pub query_auth_var: Option<&'static str>,
    /// API version when none is configured
    pub default_version: &'static str,
    /// Path appended to the base URL; `{version}` is substituted
    pub base_path: &'static str,
    /// Credential placement when none is configured
    pub default_placement: AuthPlacement,
    /// Page size when none is configured
    pub default_page_size: u32,
    /// Largest page size the API accepts
    pub max_page_size: u32,
    /// Required prefixes of the key pair, if any
    pub key_prefixes: Option<(&'static str, &'static str)>,
    /// Health check paths tried in order
    pub health_paths: &'static [&'static str],
}

const CRM_PRESET: VendorPreset = VendorPreset {
    vendor: Vendor::Crm,
    url_var: "LILU_API_URL",
    default_url: Some("https://api.servus-ululu.com"),
    key_var: "LILU_API_KEY",
    secret_var: "LILU_API_SECRET",
    token_var: Some("LILU_API_TOKEN"),
    version_var: "LILU_API_VERSION",
    timeout_var: "LILU_TIMEOUT",
    retries_var: Some("LILU_MAX_RETRIES"),
    retry_delay_var: Some("LILU_RETRY_DELAY"),
    page_size_var: Some("LILU_PAGE_SIZE"),
    query_auth_var: None,
    default_version: "v2",
    base_path: "/api/{version}",
    default_placement: AuthPlacement::Headers,
    default_page_size: 50,
    max_page_size: 100,
    key_prefixes: None,
    health_paths: &["/health"],
};

const SHOP_PRESET: VendorPreset = VendorPreset {
    vendor: Vendor::Shop,
    url_var: "WC_URL",
    default_url: None,
    key_var: "WC_CONSUMER_KEY",
    secret_var: "WC_CONSUMER_SECRET",
    token_var: None,
    version_var: "WC_API_VERSION",
    timeout_var: "WC_TIMEOUT",
    retries_var: None,
    retry_delay_var: None,
    page_size_var: None,
    query_auth_var: Some("WC_QUERY_STRING_AUTH"),
    default_version: "wc/v3",
    base_path: "/wp-json/{version}",
    default_placement: AuthPlacement::QueryString,
    default_page_size: 100,
    max_page_size: 100,
    key_prefixes: Some(("ck_", "cs_")),
    health_paths: &["/system_status", "/"],
};

impl Vendor {
    /// Preset for this vendor
    pub fn preset(self) -> &'static VendorPreset {
        match self {
            Vendor::Crm => &CRM_PRESET,
            Vendor::Shop => &SHOP_PRESET,
        }
    }
}

// ============================================================================
// Connector Config
// ============================================================================

/// Credentials: an API key pair or a bearer token, never both
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// API key or consumer key
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret or consumer secret
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
}

impl Credentials {
    /// Key pair credentials
    pub fn key_pair(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            api_secret: Some(secret.into()),
            token: None,
        }
    }

    /// Bearer token credentials
    pub fn token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("token", &redact(&self.token))
            .finish()
    }
}

/// Complete connector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Target platform
    #[serde(default)]
    pub vendor: Vendor,

    /// Site or API root URL, without the versioned base path
    #[serde(default)]
    pub base_url: String,

    /// API version; the vendor default when unset
    #[serde(default)]
    pub api_version: Option<String>,

    /// Credentials
    #[serde(default)]
    pub credentials: Credentials,

    /// Where the key pair is sent; the vendor default when unset
    #[serde(default)]
    pub auth_placement: Option<AuthPlacement>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Attempt bound per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base retry delay in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Largest retry delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Backoff curve
    #[serde(default)]
    pub backoff: BackoffType,

    /// Statuses that are retried
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,

    /// Records per page; the vendor default when unset
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Fail on unrecognized envelopes instead of wrapping them
    #[serde(default)]
    pub strict_envelopes: bool,

    /// Client-side throttle; off when unset
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

fn default_retry_statuses() -> Vec<u16> {
    DEFAULT_RETRY_STATUSES.to_vec()
}

impl ConnectorConfig {
    /// Configuration with defaults for a vendor
    pub fn new(vendor: Vendor, base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            vendor,
            base_url: base_url.into(),
            api_version: None,
            credentials,
            auth_placement: None,
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            backoff: BackoffType::default(),
            retry_statuses: default_retry_statuses(),
            page_size: None,
            strict_envelopes: false,
            requests_per_second: None,
            user_agent: None,
        }
    }

    /// Parse YAML configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("Invalid YAML config: {e}")))
    }

    /// Load YAML configuration from a file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from the process environment
    pub fn from_env(vendor: Vendor) -> Result<Self> {
        Self::from_env_with(vendor, |name| std::env::var(name).ok())
    }

    /// Load configuration through a variable lookup.
    ///
    /// Empty values count as unset. Unparsable numbers are configuration
    /// errors.
    pub fn from_env_with<F>(vendor: Vendor, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let preset = vendor.preset();
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut errors = Vec::new();

        let base_url = get(preset.url_var)
            .or_else(|| preset.default_url.map(str::to_string))
            .unwrap_or_default();

        let credentials = Credentials {
            api_key: get(preset.key_var),
            api_secret: get(preset.secret_var),
            token: preset.token_var.and_then(get),
        };

        let mut config = Self::new(vendor, base_url, credentials);
        config.api_version = get(preset.version_var);

        if let Some(timeout) = parse_var(&get, preset.timeout_var, &mut errors) {
            config.timeout_secs = timeout;
        }
        if let Some(retries) = preset
            .retries_var
            .and_then(|var| parse_var(&get, var, &mut errors))
        {
            config.max_retries = retries;
        }
        if let Some(delay_secs) = preset
            .retry_delay_var
            .and_then(|var| parse_var::<u64>(&get, var, &mut errors))
        {
            config.retry_backoff_ms = delay_secs.saturating_mul(1000);
        }
        config.page_size = preset
            .page_size_var
            .and_then(|var| parse_var(&get, var, &mut errors));
        if let Some(query_auth) = preset
            .query_auth_var
            .and_then(|var| parse_var::<bool>(&get, var, &mut errors))
        {
            config.auth_placement = Some(if query_auth {
                AuthPlacement::QueryString
            } else {
                AuthPlacement::Basic
            });
        }

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(Error::config(errors.join("; ")))
        }
    }

    /// Vendor preset
    pub fn preset(&self) -> &'static VendorPreset {
        self.vendor.preset()
    }

    /// Configured or default API version
    pub fn api_version(&self) -> &str {
        self.api_version
            .as_deref()
            .unwrap_or(self.preset().default_version)
    }

    /// Configured or default credential placement
    pub fn auth_placement(&self) -> AuthPlacement {
        self.auth_placement
            .unwrap_or(self.preset().default_placement)
    }

    /// Configured or default page size
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(self.preset().default_page_size)
    }

    /// Base URL with the versioned API path appended
    pub fn api_base_url(&self) -> String {
        self.api_base_url_for(self.api_version())
    }

    /// Base URL for a specific API version
    pub fn api_base_url_for(&self, version: &str) -> String {
        let path = self.preset().base_path.replace("{version}", version);
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Check every setting and report all problems at once
    pub fn validate(&self) -> Result<()> {
        let preset = self.preset();
        let mut errors = Vec::new();

        if self.base_url.trim().is_empty() {
            errors.push(format!("{} is required", preset.url_var));
        } else if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(format!("{} must start with http:// or https://", preset.url_var));
        } else {
            match url::Url::parse(&self.base_url) {
                Ok(parsed) if parsed.has_host() => {}
                Ok(_) => errors.push(format!("{} has no host", preset.url_var)),
                Err(e) => errors.push(format!("{} is not a valid URL: {e}", preset.url_var)),
            }
        }

        let creds = &self.credentials;
        let has_key = creds.api_key.as_deref().is_some_and(|k| !k.is_empty());
        let has_secret = creds.api_secret.as_deref().is_some_and(|s| !s.is_empty());
        let has_token = creds.token.as_deref().is_some_and(|t| !t.is_empty());

        match (has_key || has_secret, has_token) {
            (true, true) => errors.push("Configure either an API key pair or a token, not both".into()),
            (false, false) => errors.push(format!(
                "{} and {} are required",
                preset.key_var, preset.secret_var
            )),
            (true, false) => {
                if !has_key {
                    errors.push(format!("{} is required", preset.key_var));
                }
                if !has_secret {
                    errors.push(format!("{} is required", preset.secret_var));
                }
            }
            (false, true) => {
                if preset.token_var.is_none() {
                    errors.push(format!("{} does not accept token credentials", self.vendor));
                }
            }
        }

        if let Some((key_prefix, secret_prefix)) = preset.key_prefixes {
            if let Some(key) = creds.api_key.as_deref().filter(|k| !k.is_empty()) {
                if !key.starts_with(key_prefix) {
                    errors.push(format!("{} should start with '{key_prefix}'", preset.key_var));
                }
            }
            if let Some(secret) = creds.api_secret.as_deref().filter(|s| !s.is_empty()) {
                if !secret.starts_with(secret_prefix) {
                    errors.push(format!("{} should start with '{secret_prefix}'", preset.secret_var));
                }
            }
        }

        if self.timeout_secs == 0 {
            errors.push("Timeout must be at least 1 second".into());
        }
        if self.max_retries == 0 {
            errors.push("max_retries must allow at least 1 attempt".into());
        }

        let page_size = self.page_size();
        if page_size == 0 || page_size > preset.max_page_size {
            errors.push(format!(
                "page_size must be between 1 and {}, got {page_size}",
                preset.max_page_size
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::config(errors.join("; ")))
        }
    }

    /// Authentication settings derived from the credentials
    pub fn auth_config(&self) -> AuthConfig {
        let creds = &self.credentials;
        match (&creds.token, &creds.api_key, &creds.api_secret) {
            (Some(token), _, _) if !token.is_empty() => AuthConfig::bearer(token.clone()),
            (_, Some(key), Some(secret)) => {
                AuthConfig::key_pair(self.auth_placement(), key.clone(), secret.clone())
            }
            _ => AuthConfig::None,
        }
    }

    /// HTTP client settings for a specific API version
    pub fn http_client_config_for(&self, version: &str) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.api_base_url_for(version))
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.retry_backoff_ms),
                Duration::from_millis(self.max_backoff_ms.max(self.retry_backoff_ms)),
            )
            .retry_statuses(self.retry_statuses.clone());

        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::new(rps, 1));
        }
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }

    /// HTTP client settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        self.http_client_config_for(self.api_version())
    }
}

fn parse_var<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<T> {
    let raw = get(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(format!("{name} has an invalid value '{raw}'"));
            None
        }
    }
}
