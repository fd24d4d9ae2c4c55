//! Bounded FIFO of pending crawl targets
//!
//! The frontier owns both the queue and the set of URLs a crawl has already
//! seen, so every cap is enforced at a single insertion point.

use crate::config::CrawlerConfig;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A pending unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    pub depth: u32,
}

/// What happened to a URL offered to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Queued,
    AlreadySeen,
    TooDeep,
    QueueFull,
    PageLimit,
}

#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTarget>,
    /// URLs ever queued or fetched
    seen: HashSet<String>,
    /// URLs a fetch was attempted for
    visited: HashSet<String>,
    max_depth: u32,
    max_pages: usize,
    max_queue_size: usize,
}

impl Frontier {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            visited: HashSet::new(),
            max_depth: config.max_depth,
            max_pages: config.max_pages,
            max_queue_size: config.max_queue_size,
        }
    }

    /// Offers a URL at `depth`; it is queued only if every cap allows it
    ///
    /// # Returns
    ///
    /// The reason the URL was or was not admitted
    pub fn offer(&mut self, url: Url, depth: u32) -> Admission {
        if depth > self.max_depth {
            return Admission::TooDeep;
        }

        let key = url.to_string();
        if self.seen.contains(&key) {
            return Admission::AlreadySeen;
        }
        if self.queue.len() >= self.max_queue_size {
            return Admission::QueueFull;
        }
        if self.visited.len() >= self.max_pages {
            return Admission::PageLimit;
        }

        self.seen.insert(key);
        self.queue.push_back(CrawlTarget { url, depth });
        Admission::Queued
    }

    /// Takes the oldest target that has not been visited yet
    pub fn pop(&mut self) -> Option<CrawlTarget> {
        while let Some(target) = self.queue.pop_front() {
            if !self.visited.contains(target.url.as_str()) {
                return Some(target);
            }
        }
        None
    }

    /// Records a fetch attempt; returns false if it was already recorded
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        let key = url.to_string();
        self.seen.insert(key.clone());
        self.visited.insert(key)
    }

    /// Records a URL (e.g. a redirect target) so it is never queued
    pub fn mark_seen(&mut self, url: &Url) {
        self.seen.insert(url.to_string());
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// URLs queued or fetched so far, for filtering discovered links
    pub fn seen(&self) -> &HashSet<String> {
        &self.seen
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn page_limit_reached(&self) -> bool {
        self.visited.len() >= self.max_pages
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_depth: u32, max_pages: usize, max_queue_size: usize) -> CrawlerConfig {
        CrawlerConfig {
            max_depth,
            max_pages,
            max_queue_size,
            ..CrawlerConfig::default()
        }
    }

    fn url(path: &str) -> Url {
        Url::parse("https://example.com/").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new(&config(5, 10, 10));
        frontier.offer(url("/a"), 1);
        frontier.offer(url("/b"), 1);
        frontier.offer(url("/c"), 2);

        let order: Vec<String> = std::iter::from_fn(|| frontier.pop())
            .map(|t| t.url.path().to_string())
            .collect();
        assert_eq!(order, vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut frontier = Frontier::new(&config(5, 10, 10));
        assert_eq!(frontier.offer(url("/a"), 1), Admission::Queued);
        assert_eq!(frontier.offer(url("/a"), 2), Admission::AlreadySeen);
        assert_eq!(frontier.len(), 1);

        let target = frontier.pop().unwrap();
        frontier.mark_visited(&target.url);
        assert_eq!(frontier.offer(url("/a"), 1), Admission::AlreadySeen);
    }

    #[test]
    fn test_depth_cap() {
        let mut frontier = Frontier::new(&config(2, 10, 10));
        assert_eq!(frontier.offer(url("/a"), 2), Admission::Queued);
        assert_eq!(frontier.offer(url("/b"), 3), Admission::TooDeep);
    }

    #[test]
    fn test_queue_cap() {
        let mut frontier = Frontier::new(&config(5, 10, 2));
        assert_eq!(frontier.offer(url("/a"), 1), Admission::Queued);
        assert_eq!(frontier.offer(url("/b"), 1), Admission::Queued);
        assert_eq!(frontier.offer(url("/c"), 1), Admission::QueueFull);

        frontier.pop();
        assert_eq!(frontier.offer(url("/c"), 1), Admission::Queued);
    }

    #[test]
    fn test_page_cap() {
        let mut frontier = Frontier::new(&config(5, 1, 10));
        assert!(!frontier.page_limit_reached());
        frontier.mark_visited(&url("/"));
        assert!(frontier.page_limit_reached());
        assert_eq!(frontier.offer(url("/a"), 1), Admission::PageLimit);
    }

    #[test]
    fn test_pop_skips_visited() {
        let mut frontier = Frontier::new(&config(5, 10, 10));
        frontier.offer(url("/a"), 1);
        frontier.offer(url("/b"), 1);
        frontier.mark_visited(&url("/a"));

        assert_eq!(frontier.pop().unwrap().url, url("/b"));
        assert!(frontier.pop().is_none());
        assert!(frontier.is_visited(&url("/a")));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_redirect_target_not_queued() {
        let mut frontier = Frontier::new(&config(5, 10, 10));
        frontier.mark_seen(&url("/moved"));
        assert_eq!(frontier.offer(url("/moved"), 1), Admission::AlreadySeen);
        assert!(frontier.seen().contains("https://example.com/moved"));
    }
}
