//! Crawler coordinator - main crawl orchestration logic
//!
//! One call to [`Coordinator::crawl`] runs a single bounded breadth-first
//! crawl from a seed URL. All mutable crawl state (frontier, visited set,
//! aggregate, lifecycle state) lives in a session created for that call, so
//! one coordinator can serve many crawls concurrently.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::aggregate::{Aggregator, CrawlResult};
use crate::crawler::fetcher::{FetchedPage, Fetcher, HttpFetcher};
use crate::crawler::frontier::{Admission, CrawlTarget, Frontier};
use crate::crawler::page::{PageResult, PageScope};
use crate::extract::{ContactExtractor, EmailDecoder};
use crate::state::{CompletionReason, CrawlOutcome, CrawlState, StopSignal};
use crate::url::{base_host, canonicalize, is_same_site, normalize_seed, seed_document};
use crate::{ConfigError, ContactError, UrlError};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Paths probed on the root site when `probe-common-paths` is enabled
pub const LIKELY_PATHS: &[&str] = &[
    "/resume",
    "/cv",
    "/about",
    "/about-me",
    "/portfolio",
    "/profile",
    "/contact",
];

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher = HttpFetcher> {
    config: CrawlerConfig,
    fetcher: F,
    extractor: ContactExtractor,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl
    /// * `Err(ContactError)` - The HTTP client or the phone pattern could not be built
    pub fn from_config(config: &Config) -> Result<Self, ContactError> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let fetcher = HttpFetcher::from_config(&config.user_agent, timeout)?;
        Self::new(config, fetcher)
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a coordinator around any [`Fetcher`]
    pub fn new(config: &Config, fetcher: F) -> Result<Self, ContactError> {
        let extractor = ContactExtractor::new(&config.extraction)
            .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            config: config.crawler.clone(),
            fetcher,
            extractor,
        })
    }

    /// Replaces the decoder used for protected email addresses
    pub fn with_decoder(mut self, decoder: impl EmailDecoder + 'static) -> Self {
        self.extractor = self.extractor.with_decoder(decoder);
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls one seed to completion
    pub async fn crawl(&self, seed: &str) -> CrawlResult {
        self.crawl_with_stop(seed, &StopSignal::new()).await
    }

    /// Crawls one seed, returning early with a partial result once `stop` is raised
    ///
    /// Never fails: an invalid seed or an unusable root page produces an
    /// empty result whose `outcome` records the reason.
    pub async fn crawl_with_stop(&self, seed: &str, stop: &StopSignal) -> CrawlResult {
        let mut session = CrawlSession::new(seed, &self.config);

        match self.run(&mut session, stop).await {
            Ok(reason) => {
                let outcome = CrawlOutcome::Completed(reason);
                session.advance(CrawlState::Completed);
                let visited = session.frontier.visited_count();
                let result = session.aggregator.finish(outcome);
                tracing::info!(
                    "Finished {}: {} pages visited, {} crawled, {} skipped, {} emails, {} phones ({})",
                    seed,
                    visited,
                    result.pages_crawled.len(),
                    result.skipped_pages.len(),
                    result.emails.len(),
                    result.phones.len(),
                    result.outcome
                );
                result
            }
            Err(e) => {
                let outcome = CrawlOutcome::from(&e);
                session.advance(CrawlState::Aborted);
                tracing::warn!("Aborted crawl of {}: {}", seed, outcome);
                session.aggregator.abort(outcome)
            }
        }
    }

    /// Drives the frontier; errors are root failures that abort the crawl
    async fn run(
        &self,
        session: &mut CrawlSession,
        stop: &StopSignal,
    ) -> Result<CompletionReason, ContactError> {
        let root = normalize_seed(&session.seed)?;
        let mut site_host = base_host(&root).ok_or(UrlError::MissingDomain)?;
        session.aggregator.set_root(&root);
        if let Some(document) = seed_document(&session.seed) {
            tracing::debug!("Seed {} is a document, crawling {} instead", document, root);
            session.aggregator.set_seed_document(&document);
        }
        session.try_advance(CrawlState::Running)?;

        tracing::info!(
            "Starting crawl of {} (max depth {}, max pages {})",
            root,
            self.config.max_depth,
            self.config.max_pages
        );

        session.frontier.offer(root.clone(), 0);
        let mut last_fetch: Option<Instant> = None;

        loop {
            if stop.is_stopped() {
                tracing::info!("Stop requested, returning partial result for {}", root);
                return Ok(CompletionReason::Stopped);
            }
            if session.frontier.page_limit_reached() {
                return Ok(CompletionReason::PageLimit);
            }
            let Some(target) = session.frontier.pop() else {
                return Ok(CompletionReason::FrontierExhausted);
            };

            if until_stopped(stop, self.pace(&mut last_fetch)).await.is_none() {
                tracing::info!("Stop requested, returning partial result for {}", root);
                return Ok(CompletionReason::Stopped);
            }
            session.frontier.mark_visited(&target.url);
            let is_root = target.depth == 0;

            let Some(fetched) = until_stopped(stop, self.fetch_html(&target.url)).await else {
                tracing::info!("Stop requested while fetching {}", target.url);
                return Ok(CompletionReason::Stopped);
            };
            let fetched = match fetched {
                Ok(fetched) => fetched,
                Err(e) if is_root => return Err(e),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", target.url, e);
                    session.aggregator.record_skip(&target.url, e.to_string());
                    continue;
                }
            };

            if !is_same_site(&fetched.final_url, &site_host) {
                if is_root {
                    // The site lives where the root redirects to
                    if let Some(host) = base_host(&fetched.final_url) {
                        tracing::info!("Root {} redirected to {}", root, fetched.final_url);
                        site_host = host;
                    }
                } else {
                    let reason = format!("off-site redirect to {}", fetched.final_url);
                    tracing::warn!("Skipping {}: {}", target.url, reason);
                    session.aggregator.record_skip(&target.url, reason);
                    continue;
                }
            }

            let page = self.analyze(&target, &fetched, &site_host, &session.frontier);
            tracing::debug!(
                "Crawled {} (depth {}): {} links, {} contacts",
                page.url,
                page.depth,
                page.links.len(),
                page.contacts.len()
            );

            if let Ok(final_url) = canonicalize(page.final_url.clone()) {
                session.frontier.mark_seen(&final_url);
            }
            session.aggregator.add_page(&page);

            for link in page.links {
                session.enqueue(link, target.depth + 1);
            }

            if is_root && self.config.probe_common_paths {
                for path in LIKELY_PATHS {
                    if let Some(url) = root.join(path).ok().and_then(|u| canonicalize(u).ok()) {
                        session.enqueue(url, 1);
                    }
                }
            }
        }
    }

    /// Fetches a URL and checks the response is an HTML page
    async fn fetch_html(&self, url: &Url) -> Result<FetchedPage, ContactError> {
        let fetched = self.fetcher.fetch(url).await?;
        if !fetched.looks_like_html() {
            let content_type = if fetched.content_type.is_empty() {
                "unknown content type".to_string()
            } else {
                fetched.content_type.clone()
            };
            return Err(ContactError::ParseFailure(content_type));
        }
        Ok(fetched)
    }

    fn analyze(
        &self,
        target: &CrawlTarget,
        fetched: &FetchedPage,
        site_host: &str,
        frontier: &Frontier,
    ) -> PageResult {
        let scope = PageScope {
            site_host,
            seen: frontier.seen(),
            max_links: self.config.max_links_per_page,
            follow_links: target.depth < self.config.max_depth,
        };
        PageResult::analyze(target, fetched, &self.extractor, scope)
    }

    /// Observes the fixed delay between consecutive fetches
    async fn pace(&self, last_fetch: &mut Option<Instant>) {
        let delay = Duration::from_millis(self.config.request_delay_ms);
        if let Some(previous) = *last_fetch {
            if !delay.is_zero() {
                tokio::time::sleep_until(previous + delay).await;
            }
        }
        *last_fetch = Some(Instant::now());
    }
}

/// Runs `work` unless `stop` is raised first
async fn until_stopped<T>(stop: &StopSignal, work: impl Future<Output = T>) -> Option<T> {
    tokio::select! {
        biased;
        _ = stop.stopped() => None,
        value = work => Some(value),
    }
}

/// Mutable state of one crawl invocation
struct CrawlSession {
    seed: String,
    state: CrawlState,
    frontier: Frontier,
    aggregator: Aggregator,
}

impl CrawlSession {
    fn new(seed: &str, config: &CrawlerConfig) -> Self {
        Self {
            seed: seed.trim().to_string(),
            state: CrawlState::Idle,
            frontier: Frontier::new(config),
            aggregator: Aggregator::new(seed),
        }
    }

    fn try_advance(&mut self, next: CrawlState) -> Result<(), ContactError> {
        self.state = self.state.transition_to(next)?;
        Ok(())
    }

    /// Moves to a terminal state; the engine only ever requests legal ones
    fn advance(&mut self, next: CrawlState) {
        if let Err(e) = self.try_advance(next) {
            tracing::error!("{}", e);
        }
    }

    fn enqueue(&mut self, url: Url, depth: u32) {
        match self.frontier.offer(url, depth) {
            Admission::Queued | Admission::AlreadySeen => {}
            Admission::TooDeep => tracing::trace!("Dropping link beyond max depth"),
            Admission::QueueFull => tracing::trace!("Frontier full, dropping link"),
            Admission::PageLimit => tracing::trace!("Page limit reached, dropping link"),
        }
    }
}
