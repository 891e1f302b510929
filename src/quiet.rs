//! Error-swallowing facade.
//!
//! [`QuietClient`] exposes the same operations as
//! [`AbuseIpdbClient`] but never returns an error: every failure becomes
//! an [`ApiResponse`] shaped like an API error body, so callers only have
//! to check [`ApiResponse::has_error`].

use crate::client::AbuseIpdbClient;
use crate::error::Result;
use crate::response::ApiResponse;
use crate::transport::{HttpTransport, Transport};
use std::future::Future;
use std::path::Path;
use tracing::debug;

/// Await an operation and fold any error into an error response.
pub async fn quiet<F>(operation: F) -> ApiResponse
where
    F: Future<Output = Result<ApiResponse>>,
{
    match operation.await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "Returning error response");
            ApiResponse::from_error_message(e.to_string())
        }
    }
}

/// Client whose operations always return an [`ApiResponse`].
pub struct QuietClient<T = HttpTransport> {
    inner: AbuseIpdbClient<T>,
}

impl<T: Transport> QuietClient<T> {
    /// Wrap a client.
    pub fn new(inner: AbuseIpdbClient<T>) -> Self {
        Self { inner }
    }

    /// The wrapped client.
    pub fn inner(&self) -> &AbuseIpdbClient<T> {
        &self.inner
    }

    /// Unwrap the client.
    pub fn into_inner(self) -> AbuseIpdbClient<T> {
        self.inner
    }

    /// [`AbuseIpdbClient::report`], errors folded into the response.
    pub async fn report(&self, ip: &str, categories: &str, message: &str) -> ApiResponse {
        quiet(self.inner.report(ip, categories, message)).await
    }

    /// [`AbuseIpdbClient::bulk_report`], errors folded into the response.
    pub async fn bulk_report(&self, path: impl AsRef<Path>) -> ApiResponse {
        quiet(self.inner.bulk_report(path)).await
    }

    /// [`AbuseIpdbClient::clear_address`], errors folded into the response.
    pub async fn clear_address(&self, ip: &str) -> ApiResponse {
        quiet(self.inner.clear_address(ip)).await
    }

    /// [`AbuseIpdbClient::check`], errors folded into the response.
    pub async fn check(&self, ip: &str, max_age_in_days: u32, verbose: bool) -> ApiResponse {
        quiet(self.inner.check(ip, max_age_in_days, verbose)).await
    }

    /// [`AbuseIpdbClient::check_block`], errors folded into the response.
    pub async fn check_block(&self, network: &str, max_age_in_days: u32) -> ApiResponse {
        quiet(self.inner.check_block(network, max_age_in_days)).await
    }

    /// [`AbuseIpdbClient::blacklist`], errors folded into the response.
    pub async fn blacklist(&self, limit: u32, plain_text: bool, confidence_minimum: u8) -> ApiResponse {
        quiet(self.inner.blacklist(limit, plain_text, confidence_minimum)).await
    }
}

impl<T: Transport> From<AbuseIpdbClient<T>> for QuietClient<T> {
    fn from(inner: AbuseIpdbClient<T>) -> Self {
        Self::new(inner)
    }
}
