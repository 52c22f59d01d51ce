//! Transport abstraction
//!
//! The pagination and connector layers only see this trait, so tests can
//! script responses without a network.

use super::request::RequestDescriptor;
use super::response::RawResponse;
use crate::error::Result;
use async_trait::async_trait;

/// Sends one request and returns the final response after any retries.
///
/// Implementations return `Ok` for every HTTP response, whatever its status;
/// statuses are classified by the caller. `Err` is reserved for failures
/// that produced no response (timeouts, refused connections) and for
/// requests that could not be built.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        (**self).send(request).await
    }
}
