//! Output module for persisting and summarizing crawl results
//!
//! This module handles:
//! - Writing the catalog JSON artifact
//! - Computing and printing run statistics

mod json;
pub mod stats;
mod traits;

pub use json::{write_catalog_json, CatalogDocument, JsonOutputHandler};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputHandler, OutputResult, RunMetadata};
