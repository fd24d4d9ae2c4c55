//! Cross-page aggregation into the final [`CrawlResult`]

use crate::crawler::page::PageResult;
use crate::extract::{name_from_document, name_from_host, ContactSet};
use crate::state::CrawlOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use url::Url;

/// A page that was visited but contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPage {
    pub url: String,
    pub reason: String,
}

/// Contacts and bookkeeping for one crawl invocation
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// Seed exactly as supplied
    pub seed: String,
    /// Normalized crawl root; absent when the seed was invalid
    pub root: Option<String>,
    pub name: Option<String>,
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub masked_phones: BTreeSet<String>,
    /// `info@<host>` guesses for protected addresses that could not be decoded
    pub synthetic_emails: BTreeSet<String>,
    pub resume_links: Vec<String>,
    /// Successfully processed pages, in crawl order
    pub pages_crawled: Vec<String>,
    pub skipped_pages: Vec<SkippedPage>,
    pub outcome: CrawlOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlResult {
    pub fn is_aborted(&self) -> bool {
        self.outcome.is_aborted()
    }

    /// True when at least one real (non-synthetic) contact was found
    pub fn has_contacts(&self) -> bool {
        !(self.emails.is_empty() && self.phones.is_empty() && self.masked_phones.is_empty())
    }
}

/// Running aggregate for a crawl in progress
#[derive(Debug)]
pub struct Aggregator {
    seed: String,
    root: Option<Url>,
    /// Document the seed pointed at, reported as the first resume link
    seed_document: Option<Url>,
    contacts: ContactSet,
    name: Option<String>,
    resume_links: Vec<String>,
    resume_seen: HashSet<String>,
    pages_crawled: Vec<String>,
    skipped_pages: Vec<SkippedPage>,
    started_at: DateTime<Utc>,
}

impl Aggregator {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            root: None,
            seed_document: None,
            contacts: ContactSet::new(),
            name: None,
            resume_links: Vec::new(),
            resume_seen: HashSet::new(),
            pages_crawled: Vec::new(),
            skipped_pages: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn set_root(&mut self, root: &Url) {
        self.root = Some(root.clone());
    }

    /// Records the document a seed named before it was rewritten to its homepage
    pub fn set_seed_document(&mut self, document: &Url) {
        self.push_resume_link(document.to_string());
        self.seed_document = Some(document.clone());
    }

    fn push_resume_link(&mut self, link: String) {
        if self.resume_seen.insert(link.clone()) {
            self.resume_links.push(link);
        }
    }

    /// Folds one page into the aggregate
    pub fn add_page(&mut self, page: &PageResult) {
        self.pages_crawled.push(page.url.to_string());
        self.contacts.merge(&page.contacts);

        if self.name.is_none() {
            self.name = page.name.clone().filter(|n| !n.is_empty());
        }

        for link in &page.resume_links {
            self.push_resume_link(link.to_string());
        }
    }

    pub fn record_skip(&mut self, url: &Url, reason: impl Into<String>) {
        self.skipped_pages.push(SkippedPage {
            url: url.to_string(),
            reason: reason.into(),
        });
    }

    pub fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    /// Produces the result of a crawl that reached a normal end condition
    pub fn finish(self, outcome: CrawlOutcome) -> CrawlResult {
        let name = self
            .name
            .clone()
            .or_else(|| self.seed_document.as_ref().and_then(name_from_document))
            .or_else(|| self.root.as_ref().and_then(name_from_host));
        let mut result = self.into_result(outcome);
        result.name = name;
        result
    }

    /// Produces an empty result for a crawl whose root could not be used
    ///
    /// Only the seed document, if any, survives as a resume link.
    pub fn abort(self, outcome: CrawlOutcome) -> CrawlResult {
        let resume_links = self.seed_document.iter().map(Url::to_string).collect();
        Aggregator {
            contacts: ContactSet::new(),
            name: None,
            resume_links,
            pages_crawled: Vec::new(),
            ..self
        }
        .into_result(outcome)
    }

    fn into_result(self, outcome: CrawlOutcome) -> CrawlResult {
        CrawlResult {
            seed: self.seed,
            root: self.root.map(String::from),
            name: self.name,
            emails: self.contacts.emails().clone(),
            phones: self.contacts.phones().map(str::to_string).collect(),
            masked_phones: self.contacts.masked_phones().map(str::to_string).collect(),
            synthetic_emails: self.contacts.synthetic_emails().clone(),
            resume_links: self.resume_links,
            pages_crawled: self.pages_crawled,
            skipped_pages: self.skipped_pages,
            outcome,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}
