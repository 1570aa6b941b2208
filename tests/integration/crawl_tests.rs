//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock catalog sources and test
//! the full crawl cycle end-to-end: seed listing, detail enrichment,
//! cursor pagination and the stop conditions.

use reel_sweep::config::{
    Config, CrawlerConfig, GenreConfig, OutputConfig, SourceConfig, UserAgentConfig,
    MIN_REQUEST_DELAY_MS,
};
use reel_sweep::crawler::{run_crawl, Coordinator};
use reel_sweep::state::StopReason;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const PAGINATION_PATH: &str = "/api/load-movies";

/// Creates a test configuration pointing at the mock source
fn create_test_config(server: &MockServer, max_pages: u32, baseline: &[&str]) -> Config {
    Config {
        source: SourceConfig {
            origin_url: format!("{}/filmler", server.uri()),
            ..SourceConfig::default()
        },
        crawler: CrawlerConfig {
            max_pages,
            request_delay_ms: MIN_REQUEST_DELAY_MS, // Shortest allowed pause
            listing_timeout_secs: 5,
            pagination_timeout_secs: 5,
            detail_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            value: "TestBrowser/1.0".to_string(),
        },
        output: OutputConfig {
            catalog_path: "./test_movies.json".to_string(),
        },
        genres: GenreConfig {
            baseline: baseline.iter().map(|g| g.to_string()).collect(),
        },
    }
}

/// One listing card
fn item(id: Option<&str>, title: &str, slug: &str) -> String {
    let id_attr = id.map(|id| format!(r#" data-id="{}""#, id)).unwrap_or_default();
    format!(
        r#"<li class="movie-item"><a href="/film/{}"{}><img data-src="/posters/{}.jpg"><span class="title">{}</span><span class="imdb">7.1</span></a></li>"#,
        slug, id_attr, slug, title
    )
}

fn listing_page(items: &[String]) -> String {
    format!(
        "<html><body><ul class=\"movies\">{}</ul></body></html>",
        items.concat()
    )
}

fn fragment(items: &[String]) -> serde_json::Value {
    serde_json::json!({ "html": items.concat() })
}

fn detail_page(genres: &[&str]) -> String {
    let links: String = genres.iter().map(|g| format!("<a>{}</a>", g)).collect();
    format!(
        r#"<html><body>
            <iframe id="iframe" src="https://player.example.org/embed/1"></iframe>
            <div class="summary"><p>Synopsis.</p></div>
            <div class="genres">{}</div>
            <span class="duration">120 dk</span>
        </body></html>"#,
        links
    )
}

async fn mount_seed(server: &MockServer, items: &[String]) {
    Mock::given(method("GET"))
        .and(path("/filmler"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(items)))
        .mount(server)
        .await;
}

/// Every detail page answers with a playback frame and the given genres
async fn mount_details(server: &MockServer, genres: &[&str]) {
    Mock::given(method("GET"))
        .and(path_regex("^/film/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(genres)))
        .mount(server)
        .await;
}

/// Answers the pagination request carrying `cursor`
async fn mount_page(server: &MockServer, cursor: &str, body: serde_json::Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path(PAGINATION_PATH))
        .and(body_string_contains(format!("movie={}&", cursor)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

async fn pagination_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.to_string() == "POST")
        .count()
}

#[tokio::test]
async fn test_full_crawl_follows_cursor_until_payload_ends() {
    let server = MockServer::start().await;

    mount_seed(
        &server,
        &[item(Some("p1-a"), "Alpha", "alpha"), item(Some("p1-b"), "Bravo", "bravo")],
    )
    .await;
    mount_details(&server, &["Dram"]).await;
    mount_page(
        &server,
        "p1-b",
        fragment(&[item(Some("p2-a"), "Charlie", "charlie"), item(Some("p2-b"), "Delta", "delta")]),
        1,
    )
    .await;
    // Third page: the endpoint answers without a listing payload
    mount_page(&server, "p2-b", serde_json::json!({ "status": "end" }), 1).await;

    let outcome = run_crawl(create_test_config(&server, 100, &[])).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::PaginationEnded);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.pagination_requests, 2);
    assert_eq!(pagination_requests(&server).await, 2);

    let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie", "Delta"]);

    let first = &outcome.records[0];
    assert_eq!(first.id.as_deref(), Some("p1-a"));
    assert_eq!(first.url, format!("{}/film/alpha", server.uri()));
    assert_eq!(first.image, format!("{}/posters/alpha.jpg", server.uri()));
    assert_eq!(first.video_url, "https://player.example.org/embed/1");
    assert_eq!(first.summary, "Synopsis.");
    assert_eq!(first.duration, "120 dk");
    assert_eq!(first.rating, "7.1");
    assert_eq!(first.genres, vec!["Dram"]);
}

#[tokio::test]
async fn test_all_duplicate_page_stops_pagination() {
    let server = MockServer::start().await;

    mount_seed(
        &server,
        &[item(Some("a1"), "Alpha", "alpha"), item(Some("b1"), "Bravo", "bravo")],
    )
    .await;
    mount_details(&server, &[]).await;
    mount_page(
        &server,
        "b1",
        fragment(&[item(Some("a2"), "Alpha", "alpha-2"), item(Some("b2"), "Bravo", "bravo-2")]),
        1,
    )
    .await;

    let outcome = run_crawl(create_test_config(&server, 100, &[])).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::NoNewRecords);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(pagination_requests(&server).await, 1);
    // First occurrence wins
    assert_eq!(outcome.records[0].url, format!("{}/film/alpha", server.uri()));
}

#[tokio::test]
async fn test_last_record_without_id_stops_pagination() {
    let server = MockServer::start().await;

    mount_seed(
        &server,
        &[item(Some("a1"), "Alpha", "alpha"), item(None, "Bravo", "bravo")],
    )
    .await;
    mount_details(&server, &[]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fragment(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = run_crawl(create_test_config(&server, 100, &[])).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::CursorMissing);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.pagination_requests, 0);
}

#[tokio::test]
async fn test_failed_detail_fetch_keeps_record() {
    let server = MockServer::start().await;

    mount_seed(
        &server,
        &[item(Some("a1"), "Alpha", "alpha"), item(Some("b1"), "Bravo", "bravo")],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/film/alpha"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_details(&server, &["Korku"]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let outcome = run_crawl(create_test_config(&server, 100, &[])).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::PaginationEnded);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.detail_failures, 1);

    let failed = &outcome.records[0];
    assert_eq!(failed.title, "Alpha");
    assert_eq!(failed.video_url, failed.url);
    assert!(failed.genres.is_empty());
    assert_eq!(failed.summary, "");
    assert_eq!(failed.rating, "7.1");

    let enriched = &outcome.records[1];
    assert!(enriched.has_playback_source());
    assert_eq!(enriched.genres, vec!["Korku"]);
}

#[tokio::test]
async fn test_pause_follows_every_enrichment() {
    let server = MockServer::start().await;

    mount_seed(
        &server,
        &[
            item(None, "Alpha", "alpha"),
            item(None, "Bravo", "bravo"),
            item(None, "Charlie", "charlie"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/film/bravo"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&server)
        .await;
    mount_details(&server, &[]).await;

    let outcome = run_crawl(create_test_config(&server, 100, &[])).await.unwrap();

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.detail_failures, 1);
    // One pause per enriched record, the failed one included
    assert!(
        outcome.elapsed >= Duration::from_millis(3 * MIN_REQUEST_DELAY_MS),
        "crawl finished in {:?}",
        outcome.elapsed
    );
}

/// Pagination endpoint that never runs dry
struct FreshPages {
    served: AtomicUsize,
}

impl Respond for FreshPages {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        let slug = format!("generated-{}", n);
        ResponseTemplate::new(200).set_body_json(fragment(&[item(
            Some(&slug),
            &format!("Generated {}", n),
            &slug,
        )]))
    }
}

#[tokio::test]
async fn test_endless_source_stops_at_page_ceiling() {
    let server = MockServer::start().await;

    mount_seed(&server, &[item(Some("seed"), "Seed", "seed")]).await;
    mount_details(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path(PAGINATION_PATH))
        .respond_with(FreshPages {
            served: AtomicUsize::new(0),
        })
        .mount(&server)
        .await;

    let outcome = run_crawl(create_test_config(&server, 4, &[])).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::PageLimit);
    assert_eq!(outcome.pages_fetched, 4);
    assert_eq!(outcome.pagination_requests, 3);
    assert_eq!(pagination_requests(&server).await, 3);
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.records[3].title, "Generated 2");
}

#[tokio::test]
async fn test_seed_failure_returns_empty_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/filmler"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = run_crawl(create_test_config(&server, 100, &["Dram"])).await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::SeedFailed);
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.genres, vec!["Dram"]);
}

#[tokio::test]
async fn test_records_unique_and_complete_across_pages() {
    let server = MockServer::start().await;

    mount_seed(
        &server,
        &[
            item(Some("a1"), "Alpha", "alpha"),
            item(Some("a1"), "Alpha", "alpha-dup"),
            item(Some("b1"), "Bravo", "bravo"),
            // Untitled and off-source entries never become records
            r#"<li class="movie-item"><a href="/film/untitled" data-id="x"></a></li>"#.to_string(),
            r#"<li class="movie-item"><a href="https://ads.example.net/p" data-id="y"><h2>Ad</h2></a></li>"#
                .to_string(),
        ],
    )
    .await;
    mount_details(&server, &[]).await;
    mount_page(
        &server,
        "b1",
        fragment(&[item(Some("b2"), "Bravo", "bravo-2"), item(Some("c2"), "Charlie", "charlie")]),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(body_string_contains("movie=c2&"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = run_crawl(create_test_config(&server, 100, &[])).await.unwrap();

    let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie"]);

    let unique: HashSet<_> = titles.iter().collect();
    assert_eq!(unique.len(), titles.len());
    for record in &outcome.records {
        assert!(!record.title.is_empty());
        assert!(!record.video_url.is_empty());
    }
}

#[tokio::test]
async fn test_genre_taxonomy_merges_baseline() {
    let server = MockServer::start().await;

    mount_seed(&server, &[item(None, "Alpha", "alpha"), item(None, "Bravo", "bravo")]).await;
    Mock::given(method("GET"))
        .and(path("/film/alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(&["Drama", "Sci-Fi"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/film/bravo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><span class="genres"> , </span></body></html>"#),
        )
        .mount(&server)
        .await;

    let outcome = run_crawl(create_test_config(&server, 100, &["Action", "Drama"]))
        .await
        .unwrap();

    assert_eq!(outcome.stop_reason, StopReason::CursorMissing);
    assert_eq!(outcome.genres, vec!["Action", "Drama", "Sci-Fi"]);
    assert!(outcome.records[1].genres.is_empty());
}

#[tokio::test]
async fn test_stop_handle_cancels_between_pages() {
    let server = MockServer::start().await;

    mount_seed(&server, &[item(Some("a1"), "Alpha", "alpha")]).await;
    mount_details(&server, &[]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fragment(&[])))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(create_test_config(&server, 100, &[])).unwrap();
    coordinator.stop_handle().stop();
    let outcome = coordinator.run().await.unwrap();

    assert_eq!(outcome.stop_reason, StopReason::Cancelled);
    assert_eq!(outcome.records.len(), 1);
}
