//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! run metadata written next to the catalog.

use crate::crawler::CrawlOutcome;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Facts about a run that are not part of the crawl outcome itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetadata {
    /// Origin listing URL the crawl started from
    pub source: String,

    /// SHA-256 of the configuration file, absent when running on defaults
    pub config_hash: Option<String>,
}

impl RunMetadata {
    pub fn new(source: impl Into<String>, config_hash: Option<String>) -> Self {
        Self {
            source: source.into(),
            config_hash,
        }
    }
}

/// Trait for output handlers
///
/// Handlers persist a finished crawl. They run once, after the crawl has
/// reached a stop reason.
pub trait OutputHandler {
    /// Writes the crawl outcome
    ///
    /// # Arguments
    ///
    /// * `outcome` - Records, genres and counters of the finished crawl
    /// * `metadata` - Source and config identity of the run
    fn write_outcome(&self, outcome: &CrawlOutcome, metadata: &RunMetadata) -> OutputResult<()>;
}
