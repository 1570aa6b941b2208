//! Detail page enrichment
//!
//! Each newly discovered record is followed to its detail page once. The page
//! supplies the playback source (an embedded frame with a known id) plus
//! synopsis, genres, duration, rating and year. A failed fetch never reaches the
//! caller as an error: the record keeps its listing data and gets defaults.

use crate::catalog::CatalogRecord;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::selector::FallbackChain;
use crate::url::resolve_href;
use crate::SweepError;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Characters separating genres inside a single text span
const GENRE_DELIMITERS: &[char] = &[',', '/', '|'];

/// Fields read from a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    /// Absolute playback URL from the embedded frame
    pub video_url: Option<String>,
    pub summary: String,
    pub genres: Vec<String>,
    pub duration: String,
    /// Overrides the listing rating when present
    pub rating: Option<String>,
    /// Overrides the listing year when present
    pub year: Option<String>,
}

impl Enrichment {
    /// Writes the fields into a listing-stage record
    ///
    /// Without a playback source the record points at its own page.
    pub fn apply_to(self, record: &mut CatalogRecord) {
        record.video_url = self
            .video_url
            .filter(|src| !src.is_empty())
            .unwrap_or_else(|| record.url.clone());
        record.summary = self.summary;
        record.genres = self.genres;
        record.duration = self.duration;
        if let Some(rating) = self.rating {
            record.rating = rating;
        }
        if let Some(year) = self.year {
            record.year = year;
        }
    }
}

/// Extracts enrichment fields from detail pages
#[derive(Debug, Clone)]
pub struct DetailEnricher {
    playback: FallbackChain,
    summary: FallbackChain,
    genres: FallbackChain,
    duration: FallbackChain,
    rating: FallbackChain,
    year: FallbackChain,
}

impl DetailEnricher {
    pub fn new() -> Result<Self, SweepError> {
        Ok(Self {
            playback: FallbackChain::new().attr("iframe#iframe", "src")?,
            summary: FallbackChain::new()
                .text(".summary p")?
                .text("div.summary")?
                .text(".description")?
                .attr(r#"meta[name="description"]"#, "content")?,
            genres: FallbackChain::new()
                .text(".genres a")?
                .split("span.genres", GENRE_DELIMITERS)?
                .split(".genre", GENRE_DELIMITERS)?
                .text(r#"a[href*="/tur/"]"#)?,
            duration: FallbackChain::new()
                .text("span.duration")?
                .text(".runtime")?
                .text(r#"[itemprop="duration"]"#)?,
            rating: FallbackChain::new()
                .text("span.imdb")?
                .text(".imdb-rating")?
                .text("span.rating")?,
            year: FallbackChain::new()
                .text("span.year")?
                .text(".release-year")?,
        })
    }

    /// Reads every enrichment field from a parsed detail page
    ///
    /// `page_url` resolves a relative or protocol-relative frame source.
    pub fn extract(&self, document: &Html, page_url: Option<&Url>) -> Enrichment {
        let root = document.root_element();

        let video_url = self.playback.resolve(root).map(|src| {
            page_url
                .and_then(|base| resolve_href(&src, base))
                .map(|absolute| absolute.to_string())
                .unwrap_or(src)
        });

        Enrichment {
            video_url,
            summary: self.summary.resolve_or(root, ""),
            genres: self.genres.resolve_list(root),
            duration: self.duration.resolve_or(root, ""),
            rating: self.rating.resolve(root),
            year: self.year.resolve(root),
        }
    }

    /// Fetches the record's detail page and applies what it yields
    ///
    /// Returns `true` if the page was fetched. On a failed fetch the record gets
    /// `video_url = url`, an empty summary and no genres.
    pub async fn enrich(
        &self,
        fetcher: &PageFetcher,
        record: &mut CatalogRecord,
        timeout: Duration,
    ) -> bool {
        match fetcher.fetch(&record.url, timeout).await {
            Ok(page) => {
                let base = Url::parse(&page.final_url).ok();
                let enrichment = self.extract(&page.document(), base.as_ref());
                tracing::debug!(
                    "Enriched '{}': playback={}, {} genres",
                    record.title,
                    enrichment.video_url.is_some(),
                    enrichment.genres.len()
                );
                enrichment.apply_to(record);
                true
            }
            Err(failure) => {
                tracing::warn!("Detail fetch failed for '{}': {}", record.title, failure);
                Enrichment::default().apply_to(record);
                false
            }
        }
    }
}
