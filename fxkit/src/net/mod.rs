//! HTTP client abstraction
//!
//! The fetcher and retriever never talk to `reqwest` directly; they receive
//! an `Arc<dyn HttpClient>`. Tests inject scripted clients.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure (no HTTP response was received)
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS or TLS failure
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request did not finish in time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// A fully buffered HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response
    #[must_use]
    pub const fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// 2xx status
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status worth retrying: 5xx and 429
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.status >= 500 || self.status == 429
    }
}

/// Minimal GET-only HTTP client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request and buffer the whole body
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no response could be obtained. Non-2xx
    /// responses are returned as `Ok` so callers can classify them.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// [`HttpClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Create a client with a connect timeout
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the TLS backend cannot be initialised.
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("fxkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
