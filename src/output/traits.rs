//! Output handler traits and types
//!
//! This module defines the trait interface for result writers and the
//! batch-level summary shared by every format.

use crate::crawler::CrawlResult;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Totals over a batch of crawls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub seeds: usize,
    pub completed: usize,
    pub aborted: usize,
    pub with_email: usize,
    pub with_phone: usize,
    pub with_resume: usize,
    pub pages_crawled: usize,
    pub pages_skipped: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[CrawlResult]) -> Self {
        let mut summary = Self {
            seeds: results.len(),
            ..Self::default()
        };

        for result in results {
            if result.is_aborted() {
                summary.aborted += 1;
            } else {
                summary.completed += 1;
            }
            if !result.emails.is_empty() {
                summary.with_email += 1;
            }
            if !result.phones.is_empty() {
                summary.with_phone += 1;
            }
            if !result.resume_links.is_empty() {
                summary.with_resume += 1;
            }
            summary.pages_crawled += result.pages_crawled.len();
            summary.pages_skipped += result.skipped_pages.len();
        }

        summary
    }

    /// Share of seeds with at least one email, as a percentage
    pub fn email_rate(&self) -> f64 {
        if self.seeds == 0 {
            return 0.0;
        }
        (self.with_email as f64 / self.seeds as f64) * 100.0
    }
}

/// Trait for output handlers
///
/// Handlers serialize a batch of crawl results to a writer.
pub trait OutputHandler {
    /// Short format name used in log messages
    fn name(&self) -> &'static str;

    /// Writes every result to `out`
    ///
    /// # Arguments
    ///
    /// * `results` - Results in seed order
    /// * `out` - Destination (file or stdout)
    fn write_results(&self, results: &[CrawlResult], out: &mut dyn Write) -> OutputResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::{aborted_result, sample_result};

    #[test]
    fn test_summary_counts() {
        let results = vec![sample_result(), aborted_result()];
        let summary = BatchSummary::from_results(&results);

        assert_eq!(summary.seeds, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.aborted, 1);
        assert_eq!(summary.with_email, 1);
        assert_eq!(summary.with_phone, 1);
        assert_eq!(summary.pages_crawled, 2);
        assert!((summary.email_rate() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_email_rate_empty_batch() {
        assert_eq!(BatchSummary::default().email_rate(), 0.0);
    }
}
