//! HTTP transport module
//!
//! Provides the request descriptor, the retrying HTTP client and the error
//! classifier that turns statuses and transport failures into [`Error`]s.
//!
//! # Features
//!
//! - **Path Templates**: `{placeholder}` substitution checked before any I/O
//! - **Automatic Retries**: bounded attempts with a non-decreasing backoff
//! - **Rate Limiting**: optional token bucket limiter using governor
//! - **Classification**: one place maps responses to error kinds
//!
//! [`Error`]: crate::error::Error

mod classify;
mod client;
mod rate_limit;
mod request;
mod response;
mod transport;

pub use classify::{
    check_response, classify_response, classify_transport_error, retry_after_seconds,
    ResourceRef,
};
pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, DEFAULT_RETRY_STATUSES};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::RequestDescriptor;
pub use response::RawResponse;
pub use transport::Transport;
