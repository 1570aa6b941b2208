//! Crawl state definitions for the pagination state machine
//!
//! This module defines every state a crawl passes through and the conditions
//! that end it.

use crate::SweepError;
use std::fmt;

/// Why a crawl reached [`CrawlState::Done`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The seed listing page could not be fetched; nothing was collected
    SeedFailed,

    /// A listing payload produced no record that was not already collected
    NoNewRecords,

    /// The most recently collected record carried no cursor id
    CursorMissing,

    /// The configured page ceiling was reached
    PageLimit,

    /// The pagination endpoint failed or answered without a listing fragment
    PaginationEnded,

    /// The caller asked the crawl to stop at a page boundary
    Cancelled,
}

impl StopReason {
    /// Returns true if the crawl stopped because of a failed request
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::SeedFailed | Self::PaginationEnded)
    }

    /// String form used in logs and the catalog artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeedFailed => "seed_failed",
            Self::NoNewRecords => "no_new_records",
            Self::CursorMissing => "cursor_missing",
            Self::PageLimit => "page_limit",
            Self::PaginationEnded => "pagination_ended",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the current state of a crawl
///
/// ```text
/// Seeding ──► Draining ──► Paging ──► Draining ──► ... ──► Done
///    │            │           │
///    └────────────┴───────────┴──────────────────────────► Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Fetching the origin listing page
    Seeding,

    /// Requesting the next fragment from the pagination endpoint
    Paging,

    /// Enriching the new records of the current listing payload
    Draining,

    /// Terminal; the output sequence is final
    Done(StopReason),
}

impl CrawlState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// | From | To |
    /// |------|----|
    /// | Seeding | Draining, Done(SeedFailed) |
    /// | Draining | Paging, Done(any but SeedFailed/PaginationEnded) |
    /// | Paging | Draining, Done(PaginationEnded) |
    /// | Done | nothing |
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        if self.is_terminal() {
            return false;
        }

        match (self, next) {
            (Self::Seeding, Self::Draining) => true,
            (Self::Seeding, Self::Done(StopReason::SeedFailed)) => true,
            (Self::Draining, Self::Paging) => true,
            (Self::Draining, Self::Done(reason)) => !reason.is_failure(),
            (Self::Paging, Self::Draining) => true,
            (Self::Paging, Self::Done(StopReason::PaginationEnded)) => true,
            _ => false,
        }
    }

    /// Performs a transition, rejecting illegal ones
    pub fn transition(self, next: CrawlState) -> Result<CrawlState, SweepError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SweepError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeding => f.write_str("seeding"),
            Self::Paging => f.write_str("paging"),
            Self::Draining => f.write_str("draining"),
            Self::Done(reason) => write!(f, "done({})", reason),
        }
    }
}
