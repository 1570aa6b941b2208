//! Statistics generation from a finished crawl
//!
//! This module provides functionality for summarizing and displaying
//! what a crawl collected and why it stopped.

use crate::crawler::CrawlOutcome;
use crate::state::StopReason;
use std::fmt::Write;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Total number of records collected
    pub total_records: usize,

    /// Records whose detail page supplied a playback source
    pub records_with_playback: usize,

    /// Records whose detail page could not be fetched
    pub detail_failures: u32,

    /// Listing payloads processed, seed page included
    pub pages_fetched: u32,

    /// Requests sent to the pagination endpoint
    pub pagination_requests: u32,

    /// Size of the aggregated genre taxonomy
    pub genre_count: usize,

    /// Why the crawl ended
    pub stop_reason: StopReason,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        Self {
            total_records: outcome.records.len(),
            records_with_playback: outcome.playback_count(),
            detail_failures: outcome.detail_failures,
            pages_fetched: outcome.pages_fetched,
            pagination_requests: outcome.pagination_requests,
            genre_count: outcome.genres.len(),
            stop_reason: outcome.stop_reason,
            elapsed: outcome.elapsed,
        }
    }

    /// Share of records with a playback source, as a percentage
    pub fn playback_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        (self.records_with_playback as f64 / self.total_records as f64) * 100.0
    }
}

/// Formats statistics as the block printed at the end of a run
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Records collected: {}", stats.total_records);
    let _ = writeln!(
        out,
        "  With playback source: {} ({:.1}%)",
        stats.records_with_playback,
        stats.playback_rate()
    );
    let _ = writeln!(out, "  Detail fetch failures: {}", stats.detail_failures);
    let _ = writeln!(out, "  Genres: {}", stats.genre_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "Pagination:");
    let _ = writeln!(out, "  Listing pages: {}", stats.pages_fetched);
    let _ = writeln!(out, "  Pagination requests: {}", stats.pagination_requests);
    let _ = writeln!(out, "  Stop reason: {}", stats.stop_reason);
    let _ = writeln!(out, "  Duration: {:.1}s", stats.elapsed.as_secs_f64());

    out
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
    if stats.stop_reason == StopReason::SeedFailed {
        println!("\nWarning: the source could not be reached; the catalog is empty.");
    }
}
