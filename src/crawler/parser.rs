//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Same-site links to follow, in document order
//! - Page title

use crate::extract::CLOUDFLARE_PROTECTION_PATH;
use crate::url::{canonicalize, has_excluded_extension, is_same_site};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));

/// Parses a response body into a document
pub fn parse_html(body: &str) -> Html {
    Html::parse_document(body)
}

/// Extracts the page title from the HTML document
pub fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts links worth following from a page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags, resolved against the page URL and normalized
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:`, `data:` and fragment-only hrefs
/// - Links to other sites than `site_host`
/// - Static assets and documents (by path extension)
/// - URLs already in `visited`
///
/// At most `max_links` URLs are returned, keeping the first found.
///
/// # Example
///
/// ```
/// use contact_ripple::crawler::{extract_links, parse_html};
/// use std::collections::HashSet;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="https://other.org/">Other</a>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = extract_links(&parse_html(html), &page, "example.com", &HashSet::new(), 20);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/about");
/// ```
pub fn extract_links(
    document: &Html,
    page_url: &Url,
    site_host: &str,
    visited: &HashSet<String>,
    max_links: usize,
) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&ANCHOR) {
        if links.len() >= max_links {
            break;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(href, page_url) else {
            continue;
        };

        if !is_same_site(&url, site_host) || has_excluded_extension(&url) {
            continue;
        }

        let key = url.to_string();
        if visited.contains(&key) || !seen.insert(key) {
            continue;
        }

        links.push(url);
    }

    links
}

/// Resolves a link href to an absolute, normalized URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
/// - Cloudflare email-protection links, which are decoded rather than crawled
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.path().starts_with(CLOUDFLARE_PROTECTION_PATH) {
        return None;
    }
    canonicalize(absolute).ok()
}
