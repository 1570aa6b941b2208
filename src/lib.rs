//! Reel-Sweep: a paginated catalog crawler
//!
//! This crate walks a catalog listing page, follows its cursor-paginated fragments,
//! enriches every newly discovered entry from its detail page, and hands back an
//! ordered, title-deduplicated record list plus an aggregated genre taxonomy.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Reel-Sweep operations
///
/// Network and markup problems met during a crawl never surface here; they are
/// absorbed as [`crawler::FetchFailure`] values. This type covers crawler setup.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Invalid selector '{css}': {message}")]
    Selector { css: String, message: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Reel-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use catalog::{aggregate_genres, Catalog, CatalogRecord};
pub use config::Config;
pub use crawler::{CrawlOutcome, StopHandle};
pub use state::{CrawlState, StopReason};
