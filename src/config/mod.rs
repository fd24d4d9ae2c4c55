//! Configuration module for Contact-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! plus reading seed URL lists.
//!
//! # Example
//!
//! ```no_run
//! use contact_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("contact-ripple.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractionConfig, OutputConfig, OutputFormat, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use seeds::{load_seed_urls, parse_seed_list};
pub use validation::{validate, MAX_DEPTH_LIMIT};
