use serde::{Deserialize, Serialize};

/// Main configuration structure for Contact-Ripple
///
/// Every table is optional; a missing table falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl bounds and politeness settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum link depth followed from the seed (1-15)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages fetched per crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of links taken from a single page
    #[serde(rename = "max-links-per-page")]
    pub max_links_per_page: usize,

    /// Maximum number of targets waiting in the frontier
    #[serde(rename = "max-queue-size")]
    pub max_queue_size: usize,

    /// Delay between consecutive fetches (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Upper bound on a single fetch (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Enqueue well-known profile paths (/about, /cv, ...) after the root page
    #[serde(rename = "probe-common-paths")]
    pub probe_common_paths: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_pages: 50,
            max_links_per_page: 20,
            max_queue_size: 100,
            request_delay_ms: 500,
            request_timeout_secs: 20,
            probe_common_paths: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ContactRipple".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/contact-ripple".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

/// Contact extraction tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum digit count for a phone number after stripping formatting
    #[serde(rename = "min-phone-digits")]
    pub min_phone_digits: usize,

    /// Maximum digit count for a phone number (E.164 allows 15)
    #[serde(rename = "max-phone-digits")]
    pub max_phone_digits: usize,

    /// Characters that stand in for hidden digits in masked numbers
    #[serde(rename = "mask-chars")]
    pub mask_chars: String,

    /// Minimum number of mask characters before a number counts as masked
    #[serde(rename = "min-mask-chars")]
    pub min_mask_chars: usize,

    /// Decode Cloudflare-protected addresses (`data-cfemail`)
    #[serde(rename = "decode-cloudflare")]
    pub decode_cloudflare: bool,

    /// Emit `info@<host>` when a protected address cannot be decoded
    #[serde(rename = "synthetic-emails")]
    pub synthetic_emails: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_phone_digits: 7,
            max_phone_digits: 15,
            mask_chars: "Xx*".to_string(),
            min_mask_chars: 3,
            decode_cloudflare: true,
            synthetic_emails: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Result format
    pub format: OutputFormat,

    /// File to write results to (stdout when absent)
    pub path: Option<String>,
}

/// Rendering of crawl results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable summary
    #[default]
    Text,
    /// One JSON array of results
    Json,
    /// One CSV row per seed URL
    Csv,
}
