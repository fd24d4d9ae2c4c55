//! JSON-LD (`<script type="application/ld+json">`) contact extraction

use crate::extract::candidate::{Candidate, Confidence, Source};
use crate::extract::email::{clean_email, find_emails};
use crate::extract::phone::PhoneMatcher;
use serde_json::Value;

const EMAIL_KEYS: &[&str] = &["email"];
const PHONE_KEYS: &[&str] = &["telephone", "phone", "faxnumber", "mobile", "contactnumber"];

/// Extracts contacts from one JSON-LD script body
///
/// Invalid JSON yields nothing. Values under email and phone keys are taken
/// directly (with `mailto:`/`tel:` prefixes removed); every other string is
/// still scanned for email addresses.
pub fn extract_json_ld(raw: &str, phones: &PhoneMatcher) -> Vec<Candidate> {
    let value: Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::trace!("Skipping unparseable JSON-LD block: {}", e);
            return Vec::new();
        }
    };

    let mut candidates = Vec::new();
    walk(&value, None, phones, &mut candidates);
    candidates
}

fn walk(value: &Value, key: Option<&str>, phones: &PhoneMatcher, out: &mut Vec<Candidate>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let k = k.to_ascii_lowercase();
                walk(v, Some(k.as_str()), phones, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, key, phones, out);
            }
        }
        Value::String(s) => visit_string(s, key, phones, out),
        _ => {}
    }
}

fn visit_string(s: &str, key: Option<&str>, phones: &PhoneMatcher, out: &mut Vec<Candidate>) {
    match key {
        Some(k) if EMAIL_KEYS.contains(&k) => {
            let value = strip_prefix_ci(s.trim(), "mailto:");
            if let Some(email) = clean_email(value) {
                out.push(Candidate::email(email, Source::StructuredData, Confidence::Direct));
            }
        }
        Some(k) if PHONE_KEYS.contains(&k) => {
            let value = strip_prefix_ci(s.trim(), "tel:");
            if let Some(phone) = phones.classify(value, Source::StructuredData) {
                out.push(phone);
            }
        }
        _ => {
            for email in find_emails(s) {
                out.push(Candidate::email(email, Source::StructuredData, Confidence::Direct));
            }
        }
    }
}

fn strip_prefix_ci<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
        _ => value,
    }
}
