//! HTTP fetch pipeline.
//!
//! ### Transports
//! - `Transport` is the seam between the cache layer and the network.
//! - `HttpTransport` is the reqwest-backed implementation used by the binary.
//!
//! ### Safety Gates
//! - Only absolute http(s) URLs are sent.
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//! - Non-success statuses are errors, never bodies.
//!
//! ### Caching
//! - `CachedFetcher` wraps a transport with the persistent cache and the
//!   pacing delay paid before every uncached request.

pub mod cached;
pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};
use serde_json::Value;
use std::time::{Duration, Instant};

pub use cached::CachedFetcher;
pub use self::url::{UrlError, parse_fetch_url, resolve_link};

use shelfmap_core::{AppConfig, Error};

/// Network side of a fetch: one page as text, or one API call decoded as JSON.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: &str) -> Result<String, Error>;

    /// GET `base_url` with `params` as the query string and decode the body as JSON.
    async fn get_structured(&self, base_url: &str, params: &[(String, String)]) -> Result<Value, Error>;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "shelfmap/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: none, reqwest's own behavior)
    pub timeout: Option<Duration>,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "shelfmap/0.1".to_string(), max_bytes: 5 * 1024 * 1024, timeout: None, max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// reqwest-backed transport with status and size checks.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: FetchConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Send a prepared request and return the checked body.
    async fn send(&self, request: reqwest::RequestBuilder, url: &reqwest::Url) -> Result<Bytes, Error> {
        let start = Instant::now();

        let response = request.send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {} from {}", status.as_u16(), url)));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let bytes = response.bytes().await.map_err(map_send_error)?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(bytes)
    }
}

fn map_send_error(e: reqwest::Error) -> Error {
    if e.is_timeout() { Error::FetchTimeout(e.to_string()) } else { Error::HttpError(format!("network error: {}", e)) }
}

fn checked_url(input: &str) -> Result<reqwest::Url, Error> {
    parse_fetch_url(input).map_err(|e| Error::InvalidUrl(e.to_string()))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, Error> {
        let url = checked_url(url)?;
        let request = self.http.get(url.as_str()).header(
            header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        );

        let bytes = self.send(request, &url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn get_structured(&self, base_url: &str, params: &[(String, String)]) -> Result<Value, Error> {
        let url = checked_url(base_url)?;
        let request = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "application/json")
            .query(params);

        let bytes = self.send(request, &url).await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::DecodeFailed(format!("{}: {}", url, e)))
    }
}
