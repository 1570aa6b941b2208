use serde::{Deserialize, Serialize};

/// Listing URL used when no origin is configured
pub const DEFAULT_ORIGIN_URL: &str = "https://dizipal1225.com/filmler";

/// Browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Genre names the source is known to use, surfaced even when a run never sees them
pub const DEFAULT_BASELINE_GENRES: &[&str] = &[
    "Aile",
    "Aksiyon",
    "Animasyon",
    "Belgesel",
    "Bilim Kurgu",
    "Biyografi",
    "Dram",
    "Fantastik",
    "Gerilim",
    "Gizem",
    "Komedi",
    "Korku",
    "Macera",
    "Müzik",
    "Polisiye",
    "Romantik",
    "Savaş",
    "Spor",
    "Suç",
    "Tarih",
    "Western",
];

/// Main configuration structure for Reel-Sweep
///
/// Every section is optional; a missing section takes its defaults, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub genres: GenreConfig,
}

/// Where the catalog lives and how its pagination endpoint is addressed
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SourceConfig {
    /// Listing page that seeds the crawl; its scheme and host define the source
    pub origin_url: String,

    /// Path of the pagination endpoint on the source host
    pub pagination_path: String,

    /// Form field carrying the cursor
    pub cursor_field: String,

    /// Form field for the (always empty) year filter
    pub year_field: String,

    /// Form field for the (always empty) category filter
    pub category_field: String,

    /// Form field for the (always empty) sort order
    pub sort_field: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            origin_url: DEFAULT_ORIGIN_URL.to_string(),
            pagination_path: "/api/load-movies".to_string(),
            cursor_field: "movie".to_string(),
            year_field: "year".to_string(),
            category_field: "tur".to_string(),
            sort_field: "siralama".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum number of listing payloads processed, the seed page included
    pub max_pages: u32,

    /// Pause after every detail fetch (milliseconds); never below 100
    pub request_delay_ms: u64,

    /// Timeout for the seed listing request (seconds)
    pub listing_timeout_secs: u64,

    /// Timeout for pagination requests (seconds)
    pub pagination_timeout_secs: u64,

    /// Timeout for detail page requests (seconds)
    pub detail_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            request_delay_ms: 500,
            listing_timeout_secs: 30,
            pagination_timeout_secs: 20,
            detail_timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path of the JSON catalog written after a crawl
    pub catalog_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            catalog_path: "movies.json".to_string(),
        }
    }
}

/// Baseline genre taxonomy
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenreConfig {
    pub baseline: Vec<String>,
}

impl Default for GenreConfig {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE_GENRES
                .iter()
                .map(|g| g.to_string())
                .collect(),
        }
    }
}
