//! Crawler module for catalog fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of listing, pagination and detail requests
//! - Fallback-chain extraction from listing and detail markup
//! - The pagination state machine driving a whole crawl

mod coordinator;
mod detail;
mod fetcher;
mod listing;
mod selector;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, StopHandle};
pub use detail::{DetailEnricher, Enrichment};
pub use fetcher::{
    build_http_client, FetchFailure, FetchedPage, PageFetcher, PagePayload, PaginationForm,
};
pub use listing::ListingParser;
pub use selector::{compile, element_text, ElementChain, FallbackChain};

