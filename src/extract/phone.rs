//! Phone and masked-phone matching
//!
//! A single pattern finds phone-shaped runs of digits, placeholder characters
//! and formatting punctuation. Each run is then classified: runs containing
//! placeholders become masked numbers, plain runs become phone numbers, and
//! anything that fails the digit-count rules is dropped.

use crate::config::ExtractionConfig;
use crate::extract::candidate::{Candidate, Source};
use once_cell::sync::Lazy;
use regex::Regex;

/// Dates, year ranges, versions and IPv4 addresses share the phone shape
static NOT_A_PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:19|20)\d{2} ?- ?(?:19|20)\d{2}|\d{4}[-/.]\d{1,2}[-/.]\d{1,2}|\d{1,2}[-/.]\d{1,2}[-/.]\d{4}|\d{1,3}(?:\.\d{1,3}){2,})$",
    )
    .expect("valid date regex")
});

/// Finds and classifies phone-shaped strings
#[derive(Debug, Clone)]
pub struct PhoneMatcher {
    pattern: Regex,
    mask_chars: Vec<char>,
    min_digits: usize,
    max_digits: usize,
    min_mask_chars: usize,
}

impl PhoneMatcher {
    /// Builds a matcher for the configured digit bounds and mask characters
    pub fn new(config: &ExtractionConfig) -> Result<Self, regex::Error> {
        let mask_chars: Vec<char> = config.mask_chars.chars().collect();
        let class: String = mask_chars
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();

        let pattern = Regex::new(&format!(
            r"\+?\(?[0-9{class}][0-9{class} \x{{A0}}().\-]{{5,28}}[0-9{class}]"
        ))?;

        Ok(Self {
            pattern,
            mask_chars,
            min_digits: config.min_phone_digits,
            max_digits: config.max_phone_digits,
            min_mask_chars: config.min_mask_chars,
        })
    }

    fn is_mask(&self, c: char) -> bool {
        self.mask_chars.contains(&c)
    }

    /// Scans free text for phone and masked-phone candidates
    pub fn find_in_text(&self, text: &str, source: Source) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for m in self.pattern.find_iter(text) {
            let mut start = m.start();

            if !boundary_before(text, start) {
                // A mask letter glued to the previous word ("max 98...")
                let matched = m.as_str();
                let trimmed = matched.trim_start_matches(|c: char| self.is_mask(c));
                if trimmed.len() == matched.len()
                    || !trimmed.starts_with(|c: char| c == ' ' || c == '\u{a0}')
                {
                    continue;
                }
                start = m.end() - trimmed.len();
            }

            if !boundary_after(text, m.end()) {
                continue;
            }

            if let Some(candidate) = self.classify(&text[start..m.end()], source) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    /// Classifies one phone-like value (from text, `tel:` or structured data)
    pub fn classify(&self, raw: &str, source: Source) -> Option<Candidate> {
        let display = tidy(raw);
        if display.is_empty() {
            return None;
        }

        let allowed = |c: char| {
            c.is_ascii_digit() || self.is_mask(c) || matches!(c, ' ' | '+' | '(' | ')' | '-' | '.')
        };
        if !display.chars().all(allowed) {
            tracing::trace!("Discarding phone candidate with stray characters: {}", raw);
            return None;
        }

        let digits = display.chars().filter(|c| c.is_ascii_digit()).count();
        let masks = display.chars().filter(|c| self.is_mask(*c)).count();

        if masks > 0 {
            let total = digits + masks;
            if masks < self.min_mask_chars || total < self.min_digits || total > self.max_digits {
                tracing::trace!("Discarding masked candidate: {}", raw);
                return None;
            }
            let normalized: String = display
                .chars()
                .map(|c| if self.is_mask(c) { 'X' } else { c })
                .collect();
            return Some(Candidate::masked_phone(normalized, source));
        }

        if digits < self.min_digits || digits > self.max_digits {
            tracing::trace!("Discarding phone candidate with {} digits: {}", digits, raw);
            return None;
        }

        if NOT_A_PHONE_RE.is_match(&display) {
            tracing::trace!("Discarding date-like phone candidate: {}", raw);
            return None;
        }

        Some(Candidate::phone(display, source))
    }
}

/// Collapses whitespace and strips dangling separators
fn tidy(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c == '-' || c == '.')
        .to_string()
}

fn boundary_before(text: &str, start: usize) -> bool {
    match text[..start].chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || matches!(c, '@' | '/' | '_' | '=' | '#' | '&' | '%')),
    }
}

fn boundary_after(text: &str, end: usize) -> bool {
    match text[end..].chars().next() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '@' || c == '_'),
    }
}
