//! HTTP client port

use std::future::Future;
use std::pin::Pin;

use kpi_check_domain::{RequestSpec, ResponseSpec};
use thiserror::Error;

/// Transport-level failures. Any response, whatever its status, is a success
/// at this layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be built or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The transport gave up waiting.
    #[error("request timed out")]
    Timeout,

    /// The host name could not be resolved.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was hit.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// Anything else, including failures while reading the body.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests against the API under test.
///
/// Implementations resolve [`RequestSpec::path`] against their own base URL.
pub trait HttpClient: Send + Sync {
    /// Sends `request` and returns the response.
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + '_>>;

    /// Base URL requests are resolved against.
    fn base_url(&self) -> &str;
}
