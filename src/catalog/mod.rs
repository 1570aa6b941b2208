//! Catalog records and the run-wide collection that owns them
//!
//! A [`CatalogRecord`] is created from a listing entry, enriched once from its
//! detail page, and then handed to [`Catalog::try_insert`]. The catalog keeps the
//! discovery order and the title index together so neither can drift from the
//! other.

mod genres;

pub use genres::{aggregate_genres, PLACEHOLDER_GENRE};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rating shown when neither the listing nor the detail page provides one
pub const NO_RATING: &str = "-";

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    /// Opaque token the pagination endpoint accepts as a cursor
    pub id: Option<String>,

    /// Display title; unique across a run
    pub title: String,

    /// Poster image URL, possibly empty
    pub image: String,

    /// Absolute URL of the record's detail page
    pub url: String,

    /// Playback source; falls back to `url`
    pub video_url: String,

    pub year: String,
    pub duration: String,
    pub rating: String,
    pub genres: Vec<String>,
    pub summary: String,
}

impl CatalogRecord {
    /// Creates a listing-stage record
    ///
    /// `video_url` starts out as the page URL so the record is never without a
    /// playback target, even before enrichment.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: None,
            title: title.into(),
            image: String::new(),
            video_url: url.clone(),
            url,
            year: String::new(),
            duration: String::new(),
            rating: NO_RATING.to_string(),
            genres: Vec::new(),
            summary: String::new(),
        }
    }

    /// Returns true if the detail page supplied a playback source of its own
    pub fn has_playback_source(&self) -> bool {
        self.video_url != self.url
    }
}

/// Ordered output sequence plus its title index
#[derive(Debug, Default)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
    titles: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a record with this title was already collected
    pub fn contains_title(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Appends a record unless its title is already present
    ///
    /// Returns `false` and drops the record for a duplicate title; the first
    /// occurrence always wins.
    pub fn try_insert(&mut self, record: CatalogRecord) -> bool {
        if !self.titles.insert(record.title.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the catalog, yielding records in discovery order
    pub fn into_records(self) -> Vec<CatalogRecord> {
        self.records
    }
}
