//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the pagination state machine (seeding, paging, draining, done)
//! - `StopReason`: why a crawl reached its terminal state

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, StopReason};
