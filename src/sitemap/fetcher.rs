//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by an audit:
//! - Building the HTTP client (timeouts, redirects, certificate policy)
//! - Probing a link for its status code
//! - Fetching a sitemap document with a bounded body size
//!
//! Transport failures never surface as errors here. A link that produced no
//! response simply has no status.

use crate::config::{CheckerConfig, HttpConfig, LinkMethod};
use crate::SitemapError;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;

/// Result of fetching a sitemap document
#[derive(Debug)]
pub enum FetchResult {
    /// HTTP 200 with the full body
    Success {
        /// Raw document bytes
        body: Vec<u8>,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// No response (DNS, connection refused, TLS failure, timeout)
    NetworkError {
        /// Error description
        error: String,
    },

    /// HTTP 200 whose body could not be read or exceeded the size limit
    BodyError {
        /// Why the body was rejected
        error: SitemapError,
    },
}

/// Builds an HTTP client from the HTTP configuration
///
/// Redirects are followed up to `max_redirects` hops. Certificate validation
/// is skipped when `accept_invalid_certs` is set: the audit measures
/// reachability, not TLS posture.
///
/// # Example
///
/// ```
/// use sitemap_audit::config::HttpConfig;
/// use sitemap_audit::sitemap::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .redirect(Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs single-attempt fetches of links and sitemap documents
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    link_method: LinkMethod,
    max_body_bytes: u64,
}

impl Fetcher {
    /// Creates a fetcher from the audit configuration
    pub fn new(http: &HttpConfig, checker: &CheckerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(http)?,
            http.link_method,
            checker.max_sitemap_bytes,
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, link_method: LinkMethod, max_body_bytes: u64) -> Self {
        Self {
            client,
            link_method,
            max_body_bytes,
        }
    }

    /// Fetches a link and returns its HTTP status code
    ///
    /// Returns `None` on any transport-level failure. No retries are made.
    pub async fn fetch_status(&self, url: &str) -> Option<u16> {
        let request = match self.link_method {
            LinkMethod::Get => self.client.get(url),
            LinkMethod::Head => self.client.head(url),
        };

        match request.send().await {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                tracing::debug!("Fetch of {} failed: {}", url, describe_error(&e));
                None
            }
        }
    }

    /// Fetches a sitemap document
    ///
    /// The body is only read for HTTP 200 responses and is capped at the
    /// configured byte limit.
    pub async fn fetch_document(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchResult::NetworkError {
                    error: describe_error(&e),
                }
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        match read_body_limited(response, self.max_body_bytes).await {
            Ok(body) => FetchResult::Success { body },
            Err(error) => FetchResult::BodyError { error },
        }
    }
}

/// Reads a response body, failing once it grows past `limit` bytes
async fn read_body_limited(mut response: Response, limit: u64) -> Result<Vec<u8>, SitemapError> {
    if let Some(length) = response.content_length() {
        if length > limit {
            return Err(SitemapError::TooLarge { limit });
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| SitemapError::Body(e.to_string()))?
    {
        if (body.len() + chunk.len()) as u64 > limit {
            return Err(SitemapError::TooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Gives a short description of a transport error
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else {
        error.to_string()
    }
}
