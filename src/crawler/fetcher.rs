//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the headers the source expects
//! - GET requests for listing and detail pages
//! - POST requests against the pagination endpoint
//! - Classifying every failure into a [`FetchFailure`] value
//!
//! Nothing here retries. A failure is reported once and the caller decides
//! whether it ends the crawl or just defaults one record.

use crate::config::SourceConfig;
use crate::SweepError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Marker header the pagination endpoint checks for
const REQUESTED_WITH: &str = "x-requested-with";

/// Why a request produced no usable content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Connection error, timeout, or a body that could not be read
    Transport {
        url: String,
        error: String,
        timed_out: bool,
    },

    /// The server answered with a non-2xx status
    Status { url: String, status_code: u16 },

    /// The pagination endpoint answered 2xx but without a usable `html` field
    MalformedPayload { url: String, reason: String },
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport {
                url,
                error,
                timed_out: true,
            } => write!(f, "request to {} timed out: {}", url, error),
            Self::Transport { url, error, .. } => write!(f, "request to {} failed: {}", url, error),
            Self::Status { url, status_code } => write!(f, "HTTP {} from {}", status_code, url),
            Self::MalformedPayload { url, reason } => {
                write!(f, "malformed payload from {}: {}", url, reason)
            }
        }
    }
}

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

impl FetchedPage {
    /// Parses the body as an HTML document
    ///
    /// `Html` is not `Send`; parse, extract, and drop it before the next await.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// The listing fragment returned by the pagination endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePayload {
    pub html: String,
}

impl PagePayload {
    /// Decodes a pagination response body
    ///
    /// The body must be a JSON object whose `html` field is a non-blank string.
    pub fn decode(body: &str) -> Result<Self, String> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(default)]
            html: Option<String>,
        }

        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| format!("invalid JSON envelope: {}", e))?;

        match envelope.html {
            Some(html) if !html.trim().is_empty() => Ok(Self { html }),
            Some(_) => Err("empty html field".to_string()),
            None => Err("missing html field".to_string()),
        }
    }

    /// Parses the fragment for the listing parser
    pub fn document(&self) -> Html {
        Html::parse_fragment(&self.html)
    }
}

/// Form field names used by the pagination endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationForm {
    pub cursor_field: String,
    pub year_field: String,
    pub category_field: String,
    pub sort_field: String,
}

impl From<&SourceConfig> for PaginationForm {
    fn from(source: &SourceConfig) -> Self {
        Self {
            cursor_field: source.cursor_field.clone(),
            year_field: source.year_field.clone(),
            category_field: source.category_field.clone(),
            sort_field: source.sort_field.clone(),
        }
    }
}

impl PaginationForm {
    /// Form body for one pagination request; the filters are always blank
    pub fn body<'a>(&'a self, cursor: &'a str) -> [(&'a str, &'a str); 4] {
        [
            (self.cursor_field.as_str(), cursor),
            (self.year_field.as_str(), ""),
            (self.category_field.as_str(), ""),
            (self.sort_field.as_str(), ""),
        ]
    }
}

/// Builds an HTTP client carrying the headers every request needs
///
/// # Arguments
///
/// * `user_agent` - Browser user agent string
/// * `referer` - Page presented as the referer (the source's listing page)
///
/// # Example
///
/// ```no_run
/// use reel_sweep::crawler::build_http_client;
/// use url::Url;
///
/// let referer = Url::parse("https://example.com/filmler").unwrap();
/// let client = build_http_client("Mozilla/5.0", &referer).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, referer: &Url) -> Result<Client, SweepError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("tr-TR,tr;q=0.9,en;q=0.8"));
    headers.insert(
        HeaderName::from_static(REQUESTED_WITH),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    let referer_value =
        HeaderValue::from_str(referer.as_str()).map_err(|_| SweepError::InvalidHeader {
            name: "referer",
            value: referer.to_string(),
        })?;
    headers.insert(REFERER, referer_value);

    let client = Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Issues the GET and POST requests of a crawl
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    form: PaginationForm,
}

impl PageFetcher {
    pub fn new(client: Client, form: PaginationForm) -> Self {
        Self { client, form }
    }

    /// Fetches an HTML page
    ///
    /// Non-2xx responses and transport errors come back as `Err`; this never
    /// panics and never propagates a `reqwest` error.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchFailure> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_failure(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(url, e))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }

    /// Requests the listing fragment that follows `cursor`
    pub async fn fetch_page(
        &self,
        endpoint: &str,
        cursor: &str,
        timeout: Duration,
    ) -> Result<PagePayload, FetchFailure> {
        tracing::debug!("POST {} ({}={})", endpoint, self.form.cursor_field, cursor);

        let response = self
            .client
            .post(endpoint)
            .form(&self.form.body(cursor))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_failure(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                url: endpoint.to_string(),
                status_code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(endpoint, e))?;

        PagePayload::decode(&body).map_err(|reason| FetchFailure::MalformedPayload {
            url: endpoint.to_string(),
            reason,
        })
    }
}

fn transport_failure(url: &str, error: reqwest::Error) -> FetchFailure {
    FetchFailure::Transport {
        url: url.to_string(),
        timed_out: error.is_timeout(),
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_fetcher(server: &MockServer) -> PageFetcher {
        let referer = Url::parse(&format!("{}/filmler", server.uri())).unwrap();
        let client = build_http_client("TestBrowser/1.0", &referer).unwrap();
        PageFetcher::new(client, PaginationForm::from(&SourceConfig::default()))
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_build_http_client() {
        let referer = Url::parse("https://example.com/filmler").unwrap();
        assert!(build_http_client("TestBrowser/1.0", &referer).is_ok());
    }

    #[test]
    fn test_decode_payload() {
        let payload = PagePayload::decode(r#"{"html": "<li>x</li>", "count": 1}"#).unwrap();
        assert_eq!(payload.html, "<li>x</li>");
    }

    #[test]
    fn test_decode_rejects_missing_or_empty_html() {
        assert!(PagePayload::decode(r#"{"status": "ok"}"#).is_err());
        assert!(PagePayload::decode(r#"{"html": ""}"#).is_err());
        assert!(PagePayload::decode(r#"{"html": "   "}"#).is_err());
        assert!(PagePayload::decode(r#"{"html": null}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(PagePayload::decode("<html>blocked</html>").is_err());
        assert!(PagePayload::decode(r#"["html"]"#).is_err());
        assert!(PagePayload::decode(r#"{"html": 42}"#).is_err());
    }

    #[test]
    fn test_form_body_field_names() {
        let form = PaginationForm::from(&SourceConfig::default());
        assert_eq!(
            form.body("m-41"),
            [("movie", "m-41"), ("year", ""), ("tur", ""), ("siralama", "")]
        );
    }

    #[test]
    fn test_failure_display() {
        let failure = FetchFailure::Status {
            url: "https://example.com/x".to_string(),
            status_code: 503,
        };
        assert_eq!(failure.to_string(), "HTTP 503 from https://example.com/x");
    }

    #[tokio::test]
    async fn test_fetch_sends_required_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/film/dune"))
            .and(header("x-requested-with", "XMLHttpRequest"))
            .and(header("user-agent", "TestBrowser/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = create_test_fetcher(&server);
        let page = fetcher
            .fetch(&format!("{}/film/dune", server.uri()), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(page.status_code, 200);
        assert_eq!(page.body, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = create_test_fetcher(&server);
        let result = fetcher.fetch(&format!("{}/gone", server.uri()), TIMEOUT).await;
        assert!(matches!(result, Err(FetchFailure::Status { status_code: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let fetcher = create_test_fetcher(&server);
        let result = fetcher
            .fetch(&format!("{}/slow", server.uri()), Duration::from_millis(100))
            .await;
        assert!(matches!(
            result,
            Err(FetchFailure::Transport {
                timed_out: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_fetch_page_posts_cursor_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/load-movies"))
            .and(body_string_contains("movie=m-7"))
            .and(body_string_contains("siralama="))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "html": "<li>next</li>" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = create_test_fetcher(&server);
        let payload = fetcher
            .fetch_page(&format!("{}/api/load-movies", server.uri()), "m-7", TIMEOUT)
            .await
            .unwrap();
        assert_eq!(payload.html, "<li>next</li>");
    }

    #[tokio::test]
    async fn test_fetch_page_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .mount(&server)
            .await;

        let fetcher = create_test_fetcher(&server);
        let result = fetcher
            .fetch_page(&format!("{}/api/load-movies", server.uri()), "m-7", TIMEOUT)
            .await;
        assert!(matches!(result, Err(FetchFailure::MalformedPayload { .. })));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let referer = Url::parse("http://127.0.0.1:9/").unwrap();
        let client = build_http_client("TestBrowser/1.0", &referer).unwrap();
        let fetcher = PageFetcher::new(client, PaginationForm::from(&SourceConfig::default()));

        let result = fetcher.fetch("http://127.0.0.1:9/", TIMEOUT).await;
        assert!(matches!(result, Err(FetchFailure::Transport { .. })));
    }
}
