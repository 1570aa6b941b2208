//! Configuration module for Reel-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so the crawler also runs with no file at all.
//!
//! # Example
//!
//! ```no_run
//! use reel_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Crawler will stop after {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, GenreConfig, OutputConfig, SourceConfig, UserAgentConfig,
    DEFAULT_BASELINE_GENRES, DEFAULT_ORIGIN_URL, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, MIN_REQUEST_DELAY_MS};
