// src/checker/http.rs
// =============================================================================
// This module checks if external URLs are alive by making HTTP requests.
//
// Key functionality:
// - One GET request per link, no retries
// - The request is bounded by the configured timeout
// - The link is available when the status code is in the allowed set
// - Transport failures (DNS, refused, timeout, TLS, bad URL) mean unavailable
//
// The network sits behind the `Transport` trait so the checker can be tested
// without one. `HttpTransport` is the real implementation on top of reqwest.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Traits: To swap the real HTTP client for a fake one in tests
// - thiserror: To give each failure category its own error variant
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::orchestrator::ReportStream;

/// Settings shared by every external check.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Status codes that count as "available"
    pub allowed_statuses: HashSet<u16>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum number of checks in flight at once, `None` for no limit
    pub max_in_flight: Option<usize>,
    /// Where "Link unavailable" lines are printed
    pub report_to: ReportStream,
}

impl ValidatorConfig {
    pub fn new(allowed_statuses: impl IntoIterator<Item = u16>, timeout: Duration) -> Self {
        Self {
            allowed_statuses: allowed_statuses.into_iter().collect(),
            timeout,
            max_in_flight: None,
            report_to: ReportStream::default(),
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = Some(max_in_flight);
        self
    }

    pub fn with_report_to(mut self, report_to: ReportStream) -> Self {
        self.report_to = report_to;
        self
    }

    pub fn allows(&self, status: u16) -> bool {
        self.allowed_statuses.contains(&status)
    }
}

/// Why no status code could be obtained for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("could not resolve hostname")]
    Dns,
    #[error("connection failed")]
    Connect,
    #[error("SSL certificate error")]
    Tls,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Other(String),
}

// Categorizes the different ways a reqwest request can fail
impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        // Convert error to string once; the source chain carries the details
        let error_string = format!("{error:?}").to_lowercase();

        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_redirect() {
            TransportError::TooManyRedirects
        } else if error.is_connect() {
            if error_string.contains("dns") {
                TransportError::Dns
            } else {
                TransportError::Connect
            }
        } else if error_string.contains("certificate") || error_string.contains("ssl") {
            TransportError::Tls
        } else if error.is_builder() {
            TransportError::InvalidUrl(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

/// Something that can fetch a URL and report the response status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn status(&self, url: &str) -> Result<u16, TransportError>;
}

/// `Transport` over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    // Creates the HTTP client every external check reuses (connection pooling)
    //
    // Redirects follow reqwest's default policy.
    pub fn new(config: &ValidatorConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn status(&self, url: &str) -> Result<u16, TransportError> {
        let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status().as_u16();

        // Drain the body so the pooled connection can be reused. The client
        // timeout covers this read too. The status is already known, so a body
        // that never completes does not change the outcome.
        if let Err(e) = response.bytes().await {
            debug!(url, status, error = %TransportError::from(e), "Response body not fully read");
        }
        Ok(status)
    }
}

// Checks a single external link
//
// Returns true only when a response arrived and its status is allowed.
pub async fn check_external(url: &str, transport: &dyn Transport, config: &ValidatorConfig) -> bool {
    debug!(url, "Check URL");

    match transport.status(url).await {
        Ok(status) => {
            let allowed = config.allows(status);
            debug!(url, status, allowed, "Success request for URL check");
            allowed
        }
        Err(e) => {
            debug!(url, error = %e, "Error while check URL");
            false
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - We store the transport as `Arc<dyn Transport>` and call it from many
//      spawned tasks
//    - async_trait boxes the returned future so the trait stays object-safe
//      and the future is `Send`
//
// 2. Why GET and not HEAD?
//    - Plenty of servers answer HEAD with 405 or 404 while GET works
//    - The body is read and thrown away, never parsed or kept
//
// 3. Why HashSet<u16> for the allowed statuses?
//    - Only membership matters, order and duplicates don't
//    - contains() is O(1)
// -----------------------------------------------------------------------------
