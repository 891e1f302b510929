//! HTTP transport used by the client.
//!
//! The client describes each call as an [`ApiRequest`] and hands it to a
//! [`Transport`]. The transport must deliver the body for any HTTP status,
//! since AbuseIPDB reports errors as JSON on 4xx responses.

pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use url::Url;

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body; parameters travel in the query string.
    Empty,
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// Multipart upload with a single `csv` field of type `text/csv`.
    Csv { file_name: String, bytes: Vec<u8> },
}

/// A fully built API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    /// First header value with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Error from a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    /// Timeout.
    #[error("Request timed out")]
    Timeout,
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(e)
        }
    }
}

/// Something that can perform one HTTP exchange and return the body text.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response body.
    ///
    /// Non-2xx statuses are not errors; only failures to complete the
    /// exchange are.
    async fn send(&self, request: ApiRequest) -> Result<String, TransportError>;
}
