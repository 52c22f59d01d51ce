//! HTTP client with retry and rate limiting
//!
//! Provides the reqwest-backed [`Transport`] that handles:
//! - Bounded retries on transient statuses and connection failures
//! - Backoff delays that never decrease between attempts
//! - Optional client-side throttling
//! - Credential placement through the [`Authenticator`]

use super::classify::classify_transport_error;
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::request::RequestDescriptor;
use super::response::RawResponse;
use super::transport::Transport;
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Statuses that are retried before being handed to the classifier
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of attempts per request, the first one included
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Statuses that trigger another attempt
    pub retry_statuses: Vec<u16>,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            backoff_type: BackoffType::Exponential,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("vendorlink/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the attempt bound
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Replace the retryable statuses
    pub fn retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.config.retry_statuses = statuses.into();
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client without credentials
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Create a client that attaches the given credentials to every request
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::new(auth_config),
            rate_limiter,
        })
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    fn build_request(&self, request: &RequestDescriptor, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(request.method.into(), url)
            .header(reqwest::header::ACCEPT, "application/json");

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        self.authenticator.apply(req)
    }

    fn is_retryable_status(&self, status: u16) -> bool {
        self.config.retry_statuses.contains(&status)
    }

    /// Delay before the next attempt after `attempt` failed attempts.
    ///
    /// Never decreases as `attempt` grows and never exceeds `max_backoff`.
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff.saturating_mul(attempt),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt - 1);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        let path = request.render_path()?;
        let url = self.build_url(&path);
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 1;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            match self.build_request(request, &url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if self.is_retryable_status(status) && attempt < max_attempts {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "{} {} returned {}, attempt {}/{}, retrying in {:?}",
                            request.method, url, status, attempt, max_attempts, delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let headers = response.headers().clone();
                    let body = response
                        .bytes()
                        .await
                        .map_err(|e| classify_transport_error(&e, self.config.timeout))?;

                    debug!("{} {} -> {} ({} bytes)", request.method, url, status, body.len());
                    return Ok(RawResponse {
                        status,
                        headers,
                        body,
                    });
                }
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    if transient && attempt < max_attempts {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "{} {} failed ({}), attempt {}/{}, retrying in {:?}",
                            request.method, url, e, attempt, max_attempts, delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(classify_transport_error(&e, self.config.timeout));
                }
            }
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
