//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with a per-request timeout
//! - Redirect handling
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirect hops followed per request
pub const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Page body content
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the response can be parsed as an HTML page
    ///
    /// A missing Content-Type is accepted when the body starts like markup.
    pub fn looks_like_html(&self) -> bool {
        let content_type = self.content_type.to_ascii_lowercase();
        if content_type.is_empty() {
            return self.body.trim_start().starts_with('<');
        }
        content_type.contains("text/html") || content_type.contains("application/xhtml")
    }
}

/// Reasons a fetch produced no page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Retrieves pages for the crawl engine
///
/// Implementations must treat every non-2xx response as an error.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total time allowed per request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use contact_ripple::config::UserAgentConfig;
/// use contact_ripple::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "ContactRipple".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(20)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent(config))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Format: CrawlerName/Version (+ContactURL; ContactEmail)
pub fn user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from user agent settings and a timeout
    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await.map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn page(content_type: &str, body: &str) -> FetchedPage {
        FetchedPage {
            final_url: Url::parse("https://example.com/").unwrap(),
            status: 200,
            content_type: content_type.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        assert!(build_http_client(&config, Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            user_agent(&create_test_config()),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_looks_like_html() {
        assert!(page("text/html; charset=utf-8", "").looks_like_html());
        assert!(page("application/xhtml+xml", "").looks_like_html());
        assert!(page("", "  <!doctype html><p>hi</p>").looks_like_html());
        assert!(!page("application/pdf", "%PDF-1.4").looks_like_html());
        assert!(!page("", "plain words").looks_like_html());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP status 404");
        assert_eq!(FetchError::Timeout.to_string(), "request timeout");
    }
}
