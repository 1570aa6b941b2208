//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives the pagination state machine:
//! - Seeding from the origin listing page
//! - Draining each listing payload (dedup, enrichment, cursor update, pause)
//! - Paging through the cursor endpoint
//! - Deciding when the crawl is done
//!
//! Requests are strictly sequential: one listing request, then one detail request
//! per new record on that listing, then the next listing request.

use crate::catalog::{aggregate_genres, Catalog, CatalogRecord};
use crate::config::{Config, CrawlerConfig, MIN_REQUEST_DELAY_MS};
use crate::crawler::detail::DetailEnricher;
use crate::crawler::fetcher::{build_http_client, FetchedPage, PageFetcher, PagePayload, PaginationForm};
use crate::crawler::listing::ListingParser;
use crate::state::{CrawlState, StopReason};
use crate::url::SourceSite;
use crate::SweepError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Asks a running crawl to stop at its next page boundary
///
/// Clones share the same flag. A crawl never stops mid-page; the flag is read
/// after a listing payload has been fully drained.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Everything a finished crawl hands to its consumers
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Collected records in discovery order
    pub records: Vec<CatalogRecord>,

    /// Baseline taxonomy merged with every observed genre
    pub genres: Vec<String>,

    /// Why the crawl ended
    pub stop_reason: StopReason,

    /// Listing payloads processed, the seed page included
    pub pages_fetched: u32,

    /// Requests sent to the pagination endpoint
    pub pagination_requests: u32,

    /// Records whose detail page could not be fetched
    pub detail_failures: u32,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlOutcome {
    /// Number of records whose detail page supplied a playback source
    pub fn playback_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.has_playback_source())
            .count()
    }
}

/// A listing payload waiting to be drained
enum ListingBody {
    Page(FetchedPage),
    Fragment(PagePayload),
}

impl ListingBody {
    fn parse(&self, parser: &ListingParser, site: &SourceSite) -> Vec<CatalogRecord> {
        let document = match self {
            Self::Page(page) => page.document(),
            Self::Fragment(payload) => payload.document(),
        };
        parser.parse(&document, site)
    }
}

/// Main crawler coordinator structure
///
/// Owns every piece of mutable crawl state: the catalog (output sequence and
/// title index), the cursor, and the state machine.
pub struct Coordinator {
    crawler: CrawlerConfig,
    baseline_genres: Vec<String>,
    site: SourceSite,
    endpoint: Url,
    fetcher: PageFetcher,
    listing: ListingParser,
    detail: DetailEnricher,
    catalog: Catalog,
    cursor: Option<String>,
    state: CrawlState,
    pages_fetched: u32,
    pagination_requests: u32,
    detail_failures: u32,
    stop: StopHandle,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration; the origin URL comes from here
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SweepError)` - Bad origin URL, bad header value, or client build failure
    ///
    /// The pause between detail requests is raised to [`MIN_REQUEST_DELAY_MS`]
    /// when the configuration asks for less.
    pub fn new(config: Config) -> Result<Self, SweepError> {
        let mut crawler = config.crawler;
        if crawler.request_delay_ms < MIN_REQUEST_DELAY_MS {
            tracing::warn!(
                "request_delay_ms {} is below the {}ms floor, using the floor",
                crawler.request_delay_ms,
                MIN_REQUEST_DELAY_MS
            );
            crawler.request_delay_ms = MIN_REQUEST_DELAY_MS;
        }

        let site = SourceSite::parse(&config.source.origin_url)?;
        let endpoint = site.endpoint(&config.source.pagination_path)?;

        let client = build_http_client(&config.user_agent.value, site.listing_url())?;
        let fetcher = PageFetcher::new(client, PaginationForm::from(&config.source));

        tracing::debug!(
            "Source {} (domain {}), pagination endpoint {}",
            site.listing_url(),
            site.domain(),
            endpoint
        );

        Ok(Self {
            crawler,
            baseline_genres: config.genres.baseline,
            site,
            endpoint,
            fetcher,
            listing: ListingParser::new()?,
            detail: DetailEnricher::new()?,
            catalog: Catalog::new(),
            cursor: None,
            state: CrawlState::Seeding,
            pages_fetched: 0,
            pagination_requests: 0,
            detail_failures: 0,
            stop: StopHandle::new(),
        })
    }

    /// Handle for stopping this crawl at the next page boundary
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current state of the pagination state machine
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl to completion
    ///
    /// Network and markup failures never surface as `Err`; they end the crawl
    /// (listing requests) or default a single record (detail requests). The
    /// returned outcome holds everything collected up to that point.
    pub async fn run(mut self) -> Result<CrawlOutcome, SweepError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max {} pages)",
            self.site.listing_url(),
            self.crawler.max_pages
        );

        let seeded = self.seed().await;
        let mut listing = match seeded {
            Some(body) => body,
            None => return self.finish(StopReason::SeedFailed, start_time),
        };

        loop {
            self.advance(CrawlState::Draining)?;
            self.pages_fetched += 1;

            let added = self.drain(&listing).await;
            tracing::info!(
                "Page {} complete: {} new records, {} total",
                self.pages_fetched,
                added,
                self.catalog.len()
            );

            if let Some(reason) = self.stop_condition(added) {
                return self.finish(reason, start_time);
            }

            self.advance(CrawlState::Paging)?;
            let next = self.next_page().await;
            listing = match next {
                Some(body) => body,
                None => return self.finish(StopReason::PaginationEnded, start_time),
            };
        }
    }

    /// Fetches the origin listing page
    async fn seed(&mut self) -> Option<ListingBody> {
        let timeout = Duration::from_secs(self.crawler.listing_timeout_secs);
        match self
            .fetcher
            .fetch(self.site.listing_url().as_str(), timeout)
            .await
        {
            Ok(page) => Some(ListingBody::Page(page)),
            Err(failure) => {
                tracing::warn!("Seed listing fetch failed: {}", failure);
                None
            }
        }
    }

    /// Enriches and collects every new record of one listing payload
    ///
    /// Returns the number of records added.
    async fn drain(&mut self, listing: &ListingBody) -> u32 {
        let candidates = listing.parse(&self.listing, &self.site);
        let detail_timeout = Duration::from_secs(self.crawler.detail_timeout_secs);
        let delay = Duration::from_millis(self.crawler.request_delay_ms);
        let mut added = 0;

        for mut record in candidates {
            if self.catalog.contains_title(&record.title) {
                tracing::trace!("Skipping duplicate '{}'", record.title);
                continue;
            }

            let fetched = self
                .detail
                .enrich(&self.fetcher, &mut record, detail_timeout)
                .await;
            if !fetched {
                self.detail_failures += 1;
            }

            let id = record.id.clone();
            if self.catalog.try_insert(record) {
                self.cursor = id;
                added += 1;
            }

            // Back-pressure against the source, whatever the enrichment result
            tokio::time::sleep(delay).await;
        }

        added
    }

    /// Checks the between-page stop conditions in priority order
    fn stop_condition(&self, added: u32) -> Option<StopReason> {
        if added == 0 {
            Some(StopReason::NoNewRecords)
        } else if self.cursor.is_none() {
            Some(StopReason::CursorMissing)
        } else if self.pages_fetched >= self.crawler.max_pages {
            Some(StopReason::PageLimit)
        } else if self.stop.is_stopped() {
            Some(StopReason::Cancelled)
        } else {
            None
        }
    }

    /// Requests the fragment after the current cursor
    async fn next_page(&mut self) -> Option<ListingBody> {
        let cursor = self.cursor.clone()?;
        let timeout = Duration::from_secs(self.crawler.pagination_timeout_secs);

        tracing::info!("Requesting next page (cursor {})", cursor);
        self.pagination_requests += 1;

        match self
            .fetcher
            .fetch_page(self.endpoint.as_str(), &cursor, timeout)
            .await
        {
            Ok(payload) => Some(ListingBody::Fragment(payload)),
            Err(failure) => {
                tracing::info!("Pagination ended: {}", failure);
                None
            }
        }
    }

    fn advance(&mut self, next: CrawlState) -> Result<(), SweepError> {
        let next = self.state.transition(next)?;
        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    fn finish(mut self, reason: StopReason, start_time: Instant) -> Result<CrawlOutcome, SweepError> {
        self.advance(CrawlState::Done(reason))?;

        let records = std::mem::take(&mut self.catalog).into_records();
        let genres = aggregate_genres(&records, &self.baseline_genres);
        let elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl finished ({}): {} records from {} pages in {:?}",
            reason,
            records.len(),
            self.pages_fetched,
            elapsed
        );

        Ok(CrawlOutcome {
            records,
            genres,
            stop_reason: reason,
            pages_fetched: self.pages_fetched,
            pagination_requests: self.pagination_requests,
            detail_failures: self.detail_failures,
            elapsed,
        })
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use reel_sweep::config::Config;
/// use reel_sweep::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(Config::default()).await?;
/// println!("{} records, {} genres", outcome.records.len(), outcome.genres.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, SweepError> {
    Coordinator::new(config)?.run().await
}
