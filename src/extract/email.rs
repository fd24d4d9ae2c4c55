//! Email matching and validation

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

/// Top-level "domains" that are really asset names (`logo@2x.png`)
const ASSET_SUFFIXES: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "css", "js", "ico", "bmp",
];

/// Finds every well-formed email address in free text
pub fn find_emails(text: &str) -> Vec<String> {
    EMAIL_RE
        .find_iter(text)
        .filter_map(|m| clean_email(m.as_str()))
        .collect()
}

/// Trims, lowercases and validates a single address
///
/// Returns `None` when the value is not `local@domain.tld` shaped.
pub fn clean_email(raw: &str) -> Option<String> {
    let email = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '<' | '>' | '"' | '\''))
        .to_lowercase();

    if is_valid_email(&email) {
        Some(email)
    } else {
        tracing::trace!("Discarding malformed email candidate: {}", raw);
        None
    }
}

/// Checks the `local@domain.tld` shape
///
/// Exactly one `@`, no whitespace, a non-empty local part, a dotted domain
/// with no empty labels, and an alphabetic TLD of at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() || local.starts_with('.') || local.ends_with('.') {
        return false;
    }

    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return false;
    }

    let tld = domain.rsplit('.').next().unwrap_or_default();
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    !ASSET_SUFFIXES.contains(&tld.to_ascii_lowercase().as_str())
}

/// Extracts addresses from a `mailto:` href
///
/// Drops the query (`?subject=...`), splits comma-separated recipients and
/// undoes the common percent escapes.
pub fn parse_mailto(href: &str) -> Vec<String> {
    let lower = href.trim().to_ascii_lowercase();
    if !lower.starts_with("mailto:") {
        return Vec::new();
    }

    let rest = &href.trim()["mailto:".len()..];
    let addresses = rest.split('?').next().unwrap_or_default();

    addresses
        .replace("%40", "@")
        .replace("%20", "")
        .split(',')
        .filter_map(clean_email)
        .collect()
}

/// Reverses human-readable obfuscation (`jane [at] example [dot] com`)
pub fn deobfuscate(raw: &str) -> String {
    let mut value = raw.to_lowercase();
    for (pattern, replacement) in [
        ("[at]", "@"),
        ("(at)", "@"),
        ("{at}", "@"),
        (" at ", "@"),
        ("[dot]", "."),
        ("(dot)", "."),
        ("{dot}", "."),
        (" dot ", "."),
    ] {
        value = value.replace(pattern, replacement);
    }
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
