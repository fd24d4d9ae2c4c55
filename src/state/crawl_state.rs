//! Crawl lifecycle definitions
//!
//! One crawl invocation moves `Idle -> Running -> {Completed, Aborted}`.
//! The outcome attached to a finished crawl records why it stopped.

use crate::ContactError;
use serde::Serialize;
use std::fmt;

/// Lifecycle state of a single crawl invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    /// Frontier seeded, nothing fetched yet
    Idle,

    /// Consuming the frontier
    Running,

    /// Finished normally (bounds hit, frontier drained, or stopped)
    Completed,

    /// The seed was invalid or the root page could not be fetched
    Aborted,
}

impl CrawlState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Returns true if `self -> next` is a legal transition
    ///
    /// An invalid seed aborts straight from `Idle`.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Aborted)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Aborted)
        )
    }

    /// Returns `next` if the transition is legal
    pub fn transition_to(self, next: CrawlState) -> Result<CrawlState, ContactError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ContactError::InvalidTransition { from: self, to: next })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a crawl stopped consuming its frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// No targets left (includes the case where depth stopped all enqueueing)
    FrontierExhausted,

    /// `max_pages` fetches were made
    PageLimit,

    /// An external stop signal was observed; the result is partial
    Stopped,
}

/// Final outcome of a crawl, kept on the result for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// Crawl ran to one of its normal end conditions
    Completed(CompletionReason),

    /// The seed could not be parsed; nothing was fetched
    InvalidUrl(String),

    /// The root page could not be fetched (network, timeout, non-2xx)
    FetchFailure(String),

    /// The root page was fetched but is not HTML
    ParseFailure(String),
}

impl CrawlOutcome {
    /// Returns true if the crawl ended in the `Aborted` state
    pub fn is_aborted(&self) -> bool {
        !matches!(self, Self::Completed(_))
    }

    /// The lifecycle state this outcome corresponds to
    pub fn state(&self) -> CrawlState {
        if self.is_aborted() {
            CrawlState::Aborted
        } else {
            CrawlState::Completed
        }
    }
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(CompletionReason::FrontierExhausted) => write!(f, "completed"),
            Self::Completed(CompletionReason::PageLimit) => write!(f, "completed (page limit)"),
            Self::Completed(CompletionReason::Stopped) => write!(f, "stopped early"),
            Self::InvalidUrl(msg) => write!(f, "invalid url: {}", msg),
            Self::FetchFailure(msg) => write!(f, "fetch failure: {}", msg),
            Self::ParseFailure(msg) => write!(f, "parse failure: {}", msg),
        }
    }
}
