//! Contact-Ripple: a bounded contact crawler
//!
//! This crate crawls a candidate's website breadth-first, staying on the
//! seed's site and within depth, page and queue limits, and collects the
//! email addresses, phone numbers and masked phone numbers it finds.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Contact-Ripple operations
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Fetch failed: {0}")]
    FetchFailure(#[from] crawler::FetchError),

    #[error("Not an HTML page: {0}")]
    ParseFailure(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&ContactError> for state::CrawlOutcome {
    fn from(error: &ContactError) -> Self {
        match error {
            ContactError::InvalidUrl(e) => Self::InvalidUrl(e.to_string()),
            ContactError::UrlParse(e) => Self::InvalidUrl(e.to_string()),
            ContactError::FetchFailure(e) => Self::FetchFailure(e.to_string()),
            ContactError::ParseFailure(detail) => Self::ParseFailure(detail.clone()),
            other => Self::FetchFailure(other.to_string()),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to read seed list: {0}")]
    SeedList(#[from] csv::Error),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Contact-Ripple operations
pub type Result<T> = std::result::Result<T, ContactError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlResult};
pub use state::{CrawlOutcome, StopSignal};
pub use crate::url::{base_host, normalize_seed, normalize_url};
