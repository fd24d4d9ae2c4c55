//! Per-page analysis: links, contacts and profile metadata

use crate::crawler::fetcher::FetchedPage;
use crate::crawler::frontier::CrawlTarget;
use crate::crawler::parser::{extract_links, extract_title, parse_html};
use crate::extract::{guess_name_from_dom, resume_links, Candidate, ContactExtractor, ContactSet};
use std::collections::HashSet;
use url::Url;

/// How links on a page are filtered
#[derive(Debug, Clone, Copy)]
pub struct PageScope<'a> {
    /// Base host of the crawl root
    pub site_host: &'a str,
    /// URLs already queued or fetched
    pub seen: &'a HashSet<String>,
    pub max_links: usize,
    /// False once the page sits at the maximum depth
    pub follow_links: bool,
}

/// Everything learned from one fetched page
#[derive(Debug, Clone)]
pub struct PageResult {
    /// URL as taken from the frontier
    pub url: Url,
    /// URL after redirects
    pub final_url: Url,
    pub depth: u32,
    pub title: Option<String>,
    pub name: Option<String>,
    pub links: Vec<Url>,
    pub candidates: Vec<Candidate>,
    pub contacts: ContactSet,
    pub resume_links: Vec<Url>,
}

impl PageResult {
    /// Parses a fetched page and runs link and contact extraction
    pub fn analyze(
        target: &CrawlTarget,
        page: &FetchedPage,
        extractor: &ContactExtractor,
        scope: PageScope<'_>,
    ) -> Self {
        let document = parse_html(&page.body);
        let base = &page.final_url;

        let links = if scope.follow_links {
            extract_links(&document, base, scope.site_host, scope.seen, scope.max_links)
        } else {
            Vec::new()
        };

        let candidates = extractor.extract(&document, base);
        let contacts = ContactSet::from_candidates(&candidates);

        Self {
            url: target.url.clone(),
            final_url: base.clone(),
            depth: target.depth,
            title: extract_title(&document),
            name: guess_name_from_dom(&document),
            links,
            candidates,
            contacts,
            resume_links: resume_links(&document, base, scope.site_host),
        }
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.contacts.emails().iter().map(String::as_str)
    }

    pub fn phones(&self) -> impl Iterator<Item = &str> {
        self.contacts.phones()
    }

    pub fn masked_phones(&self) -> impl Iterator<Item = &str> {
        self.contacts.masked_phones()
    }
}
