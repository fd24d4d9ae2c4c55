//! Seed list loading
//!
//! Seed files hold one URL per line, or a CSV whose first column is the URL
//! (e.g. `url,notes`). Blank lines and lines starting with `#` are ignored.

use crate::ConfigError;
use csv::{ReaderBuilder, Trim};
use std::path::Path;

/// Reads seed URLs from a file
pub fn load_seed_urls(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_seed_list(&content)
}

/// Parses seed URLs from text, preserving order and dropping repeats
pub fn parse_seed_list(content: &str) -> Result<Vec<String>, ConfigError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut seeds: Vec<String> = Vec::new();

    for record in reader.records() {
        let record = record?;
        let Some(url) = record.get(0).map(|field| field.trim_start_matches('\u{feff}').trim())
        else {
            continue;
        };
        if url.is_empty() || url.eq_ignore_ascii_case("url") {
            continue;
        }

        if !seeds.iter().any(|s| s == url) {
            seeds.push(url.to_string());
        }
    }

    Ok(seeds)
}
