//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one crawl invocation
//! - `CrawlOutcome`: why a crawl ended, reported alongside its result
//! - `StopSignal`: caller-side handle for ending a crawl early

mod crawl_state;
mod stop_signal;

// Re-export main types
pub use crawl_state::{CompletionReason, CrawlOutcome, CrawlState};
pub use stop_signal::StopSignal;
