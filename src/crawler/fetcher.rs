//! Page fetching
//!
//! The crawl core only sees the [`PageFetcher`] trait: give it a URL, get a
//! [`FetchResult`] back. [`HttpFetcher`] is the production implementation on
//! top of `reqwest`, and owns everything network related:
//! - Building the client with an identifying user agent
//! - Status and Content-Type classification
//! - Retrying transient failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether another attempt may succeed
        transient: bool,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if retrying the request may produce a different outcome
    ///
    /// | Condition | Transient |
    /// |-----------|-----------|
    /// | HTTP 429 | yes |
    /// | HTTP 5xx | yes |
    /// | Timeout | yes |
    /// | Other HTTP errors | no |
    /// | Connection refused | no |
    /// | Content mismatch | no |
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpError { status_code } => {
                *status_code == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status_code >= 500
            }
            Self::NetworkError { transient, .. } => *transient,
            Self::Success { .. } | Self::ContentMismatch { .. } => false,
        }
    }

    /// Consumes the result, returning the body of a successful fetch
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Retrieves pages for the crawl
///
/// Implementations must never fail the crawl: every outcome, including
/// network errors, is reported as a [`FetchResult`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// The user agent has the form `CrawlerName/Version (+ContactURL; ContactEmail)`.
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `reqwest`-backed fetcher with retry on transient failures
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawler and user agent settings
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            user_agent,
            Duration::from_secs(crawler.request_timeout_secs),
        )?;

        Ok(Self {
            client,
            max_retries: crawler.max_retries,
            retry_delay: Duration::from_millis(crawler.retry_delay_ms),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        let mut attempt = 0;

        loop {
            let result = fetch_url(&self.client, url.as_str()).await;

            if !result.is_transient() || attempt >= self.max_retries {
                return result;
            }

            attempt += 1;
            tracing::debug!(
                "Transient failure for {} ({:?}), retry {}/{}",
                url,
                result,
                attempt,
                self.max_retries
            );
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}

/// Performs a single GET request and classifies the outcome
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("html") {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => classify_error(&e),
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            transient: true,
        }
    } else if e.is_connect() {
        FetchResult::NetworkError {
            error: "Connection refused".to_string(),
            transient: false,
        }
    } else {
        FetchResult::NetworkError {
            error: e.to_string(),
            transient: false,
        }
    }
}
