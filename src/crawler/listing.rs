//! Listing parser
//!
//! Turns a listing page or a paginated fragment into listing-stage
//! [`CatalogRecord`]s: id, title, image, page URL, and the rating and year the
//! listing card shows. Enrichment fills the rest later.

use crate::catalog::{CatalogRecord, NO_RATING};
use crate::crawler::selector::{ElementChain, FallbackChain};
use crate::url::SourceSite;
use crate::SweepError;
use scraper::{ElementRef, Html};

/// Entry selectors, most specific first
const ENTRY_SELECTORS: &[&str] = &["li.movie-item", "li.item", "li"];

/// Extracts candidate records from listing markup
#[derive(Debug, Clone)]
pub struct ListingParser {
    entries: ElementChain,
    id: FallbackChain,
    title: FallbackChain,
    image: FallbackChain,
    url: FallbackChain,
    rating: FallbackChain,
    year: FallbackChain,
}

impl ListingParser {
    pub fn new() -> Result<Self, SweepError> {
        Ok(Self {
            entries: ElementChain::new(ENTRY_SELECTORS)?,
            id: FallbackChain::new()
                .attr("a[data-id]", "data-id")?
                .attr("[data-id]", "data-id")?,
            title: FallbackChain::new()
                .text("span.title")?
                .text("h2")?
                .text("h3")?
                .attr("a[title]", "title")?,
            image: FallbackChain::new()
                .attr("img[data-src]", "data-src")?
                .attr("img[src]", "src")?,
            url: FallbackChain::new().attr("a[href]", "href")?,
            rating: FallbackChain::new()
                .text("span.imdb")?
                .text("span.rating")?,
            year: FallbackChain::new().text("span.year")?,
        })
    }

    /// Parses every entry in document order
    ///
    /// Entries without a title, or whose link does not resolve to a page on the
    /// source domain, are skipped. Duplicates are kept; deduplication belongs to
    /// the crawl.
    pub fn parse(&self, document: &Html, site: &SourceSite) -> Vec<CatalogRecord> {
        let entries = self.entries.select(document.root_element());
        let total = entries.len();

        let records: Vec<CatalogRecord> = entries
            .into_iter()
            .filter_map(|entry| self.parse_entry(entry, site))
            .collect();

        tracing::debug!(
            "Listing parsed: {} of {} entries kept",
            records.len(),
            total
        );
        records
    }

    fn parse_entry(&self, entry: ElementRef<'_>, site: &SourceSite) -> Option<CatalogRecord> {
        let title = self.title.resolve(entry)?;

        let href = self.url.resolve(entry)?;
        let url = site.absolutize(&href)?;
        if !site.owns(&url) {
            tracing::trace!("Skipping off-source entry '{}' -> {}", title, url);
            return None;
        }

        let mut record = CatalogRecord::new(title, url.as_str());
        record.id = self.id.resolve(entry);
        record.image = self
            .image
            .resolve(entry)
            .map(|src| {
                site.absolutize(&src)
                    .map(|absolute| absolute.to_string())
                    .unwrap_or(src)
            })
            .unwrap_or_default();
        record.rating = self.rating.resolve_or(entry, NO_RATING);
        record.year = self.year.resolve_or(entry, "");

        Some(record)
    }
}
