//! Tagged contact candidates and the de-duplication policy shared by
//! per-page extraction and cross-page aggregation.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Category a candidate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Email,
    Phone,
    MaskedPhone,
}

/// Where on the page a candidate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Regex over rendered text nodes
    VisibleText,
    /// `href="mailto:..."`
    Mailto,
    /// `href="tel:..."`
    TelLink,
    /// `data-email`, `data-phone`, `data-user` + `data-domain`, ...
    DataAttribute,
    /// `<script type="application/ld+json">`
    StructuredData,
    /// Cloudflare email protection payload
    Cloudflare,
    /// Built from the page host after a protected address failed to decode
    DomainFallback,
}

/// How much a candidate can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Guessed from the site's domain; never merged with scraped addresses
    Synthetic,
    /// Recovered by undoing an obfuscation
    Decoded,
    /// Present verbatim on the page
    Direct,
}

/// One extracted value with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub value: String,
    pub kind: ContactKind,
    pub source: Source,
    pub confidence: Confidence,
}

impl Candidate {
    pub fn email(value: impl Into<String>, source: Source, confidence: Confidence) -> Self {
        Self {
            value: value.into(),
            kind: ContactKind::Email,
            source,
            confidence,
        }
    }

    pub fn phone(value: impl Into<String>, source: Source) -> Self {
        Self {
            value: value.into(),
            kind: ContactKind::Phone,
            source,
            confidence: Confidence::Direct,
        }
    }

    pub fn masked_phone(value: impl Into<String>, source: Source) -> Self {
        Self {
            value: value.into(),
            kind: ContactKind::MaskedPhone,
            source,
            confidence: Confidence::Direct,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.confidence == Confidence::Synthetic
    }
}

/// Digits of a phone number, used as its identity
pub fn phone_key(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digits and `X` placeholders of a masked number, used as its identity
pub fn masked_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect()
}

/// De-duplicated contact sets
///
/// Emails compare case-insensitively and are stored lowercase. Phones compare
/// by digit sequence and keep the first formatting seen. Masked numbers compare
/// by digits plus `X` placeholders. A scraped email always displaces a
/// synthetic one with the same address; a synthetic email is never added when
/// the address was already scraped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSet {
    emails: BTreeSet<String>,
    synthetic_emails: BTreeSet<String>,
    phones: BTreeMap<String, String>,
    masked_phones: BTreeMap<String, String>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from candidates in the order they were found
    pub fn from_candidates<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> Self {
        let mut set = Self::new();
        for candidate in candidates {
            set.insert(candidate);
        }
        set
    }

    /// Inserts a candidate; returns true if it added a new entry
    pub fn insert(&mut self, candidate: &Candidate) -> bool {
        match candidate.kind {
            ContactKind::Email if candidate.is_synthetic() => {
                self.insert_synthetic_email(&candidate.value)
            }
            ContactKind::Email => self.insert_email(&candidate.value),
            ContactKind::Phone => self.insert_phone(&candidate.value),
            ContactKind::MaskedPhone => self.insert_masked_phone(&candidate.value),
        }
    }

    /// Folds another set into this one under the same policy
    pub fn merge(&mut self, other: &ContactSet) {
        for email in &other.emails {
            self.insert_email(email);
        }
        for email in &other.synthetic_emails {
            self.insert_synthetic_email(email);
        }
        for phone in other.phones.values() {
            self.insert_phone(phone);
        }
        for masked in other.masked_phones.values() {
            self.insert_masked_phone(masked);
        }
    }

    fn insert_email(&mut self, value: &str) -> bool {
        let key = value.to_lowercase();
        self.synthetic_emails.remove(&key);
        self.emails.insert(key)
    }

    fn insert_synthetic_email(&mut self, value: &str) -> bool {
        let key = value.to_lowercase();
        if self.emails.contains(&key) {
            return false;
        }
        self.synthetic_emails.insert(key)
    }

    fn insert_phone(&mut self, value: &str) -> bool {
        let key = phone_key(value);
        if key.is_empty() || self.phones.contains_key(&key) || self.masked_phones.contains_key(&key)
        {
            return false;
        }
        self.phones.insert(key, value.to_string());
        true
    }

    fn insert_masked_phone(&mut self, value: &str) -> bool {
        let key = masked_key(value);
        if key.is_empty() || self.masked_phones.contains_key(&key) || self.phones.contains_key(&key)
        {
            return false;
        }
        self.masked_phones.insert(key, value.to_string());
        true
    }

    pub fn emails(&self) -> &BTreeSet<String> {
        &self.emails
    }

    pub fn synthetic_emails(&self) -> &BTreeSet<String> {
        &self.synthetic_emails
    }

    /// Phone numbers in their first-seen formatting, ordered by digits
    pub fn phones(&self) -> impl Iterator<Item = &str> {
        self.phones.values().map(String::as_str)
    }

    pub fn masked_phones(&self) -> impl Iterator<Item = &str> {
        self.masked_phones.values().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.synthetic_emails.is_empty()
            && self.phones.is_empty()
            && self.masked_phones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emails.len() + self.synthetic_emails.len() + self.phones.len() + self.masked_phones.len()
    }
}
