//! Crawler module for bounded contact crawls
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing and link extraction
//! - The bounded frontier and per-crawl aggregation
//! - Overall crawl coordination and batch execution

mod aggregate;
mod coordinator;
mod fetcher;
mod frontier;
mod page;
mod parser;

pub use aggregate::{Aggregator, CrawlResult, SkippedPage};
pub use coordinator::{Coordinator, LIKELY_PATHS};
pub use fetcher::{
    build_http_client, user_agent, FetchError, FetchedPage, Fetcher, HttpFetcher, MAX_REDIRECTS,
};
pub use frontier::{Admission, CrawlTarget, Frontier};
pub use page::{PageResult, PageScope};
pub use parser::{extract_links, extract_title, parse_html};

use crate::state::StopSignal;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Crawls many seeds with at most `concurrency` crawls in flight
///
/// Crawls share only the coordinator (configuration, HTTP client and
/// extractor); each has its own frontier and aggregate. Results come back in
/// seed order. A crawl task that panics is logged and left out.
///
/// # Arguments
///
/// * `coordinator` - Shared coordinator
/// * `seeds` - Seed URLs, one crawl each
/// * `concurrency` - Maximum simultaneous crawls (at least 1)
/// * `stop` - Raised to end every running crawl early
pub async fn run_batch<F>(
    coordinator: Arc<Coordinator<F>>,
    seeds: Vec<String>,
    concurrency: usize,
    stop: StopSignal,
) -> Vec<CrawlResult>
where
    F: Fetcher + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let total = seeds.len();

    for (index, seed) in seeds.into_iter().enumerate() {
        let coordinator = Arc::clone(&coordinator);
        let semaphore = Arc::clone(&semaphore);
        let stop = stop.clone();

        tasks.spawn(async move {
            // The semaphore is never closed
            let _permit = semaphore.acquire_owned().await.ok();
            tracing::debug!("Starting seed {}/{}: {}", index + 1, total, seed);
            (index, coordinator.crawl_with_stop(&seed, &stop).await)
        });
    }

    let mut slots: Vec<Option<CrawlResult>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => tracing::error!("Crawl task failed: {}", e),
        }
    }

    slots.into_iter().flatten().collect()
}
