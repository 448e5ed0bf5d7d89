//! HTTP fetch pipeline for the offline worker.
//!
//! ### URL Canonicalization
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### Bounds
//! - Bounded per-request timeout, so a hung fetch becomes a typed failure
//!   instead of an indefinitely pending response
//! - Max redirects: 5
//! - Max body bytes: 10MB (configurable)
//!
//! Statuses are returned as data, never raised as errors: the worker's
//! caching policies decide what a 404 or 500 means.

pub mod url;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};

pub use url::{UrlError, canonicalize, resolve};

use squall_core::{Error, ResourceRequest, WorkerConfig};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "squall/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 10MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "squall/0.1".to_string(),
            max_bytes: 10 * 1024 * 1024,
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    /// Derive fetch settings from the worker configuration.
    pub fn from_worker(config: &WorkerConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Response from a fetch operation, in host-independent terms.
///
/// Plain status/header/body fields keep reqwest types out of the worker's
/// decision logic and out of test doubles.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// The canonical URL that was requested
    pub url: String,
    /// The final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Response body bytes
    pub body: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchedResponse {
    /// Content-Type header value, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }
}

/// How the worker reaches the network.
///
/// Implementations issue a GET for the request's URL; the worker never
/// forwards other methods. The production implementation is
/// [`HttpFetcher`]; tests script their own.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &ResourceRequest) -> Result<FetchedResponse, Error>;
}

/// reqwest-backed fetch client.
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::NetworkUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &ResourceRequest) -> Result<FetchedResponse, Error> {
        let start = Instant::now();
        let url = canonicalize(&request.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut outgoing = self.http.get(url.as_str());
        if let Some(accept) = &request.accept {
            outgoing = outgoing.header(header::ACCEPT, accept);
        }

        let response = outgoing.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::TooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect::<Vec<_>>();

        let body = response.bytes().await.map_err(classify)?;

        if body.len() > self.config.max_bytes {
            return Err(Error::TooLarge(format!("{} bytes exceeds {}", body.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} {} in {}ms ({} bytes)", url, final_url, status, fetch_ms, body.len());

        Ok(FetchedResponse { url: url.to_string(), final_url, status, headers, body, fetch_ms })
    }
}

/// Map reqwest failures onto the worker's error taxonomy.
fn classify(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::NetworkUnavailable(format!("network error: {err}"))
    }
}
