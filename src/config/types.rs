use serde::Deserialize;

/// Default cap on extracted or crawled content, in characters
pub const DEFAULT_CONTENT_CAP: usize = 50_000;

/// Browser-like User-Agent sent with direct page fetches
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Main configuration structure for Site-Ingest
///
/// Built once at startup and passed to every component.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub scrape: ScrapeSettings,
    pub sitemap: SitemapSettings,
    pub crawl_service: CrawlServiceSettings,
}

/// Remote content store connection
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store (e.g. `https://xyz.supabase.co`)
    pub base_url: String,

    /// Service credential sent as `apikey` and bearer token
    pub service_key: String,

    /// Collection rows are inserted into
    pub table: String,
}

/// Crawling service connection, only needed by the crawl pipeline
#[derive(Debug, Clone)]
pub struct CrawlServiceConfig {
    pub api_key: String,
    pub base_url: String,

    /// Delay between crawl status polls (milliseconds)
    pub poll_interval_ms: u64,
}

/// Tunables read from the optional settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scrape: ScrapeSettings,
    pub sitemap: SitemapSettings,
    #[serde(rename = "crawl-service")]
    pub crawl_service: CrawlServiceSettings,
    pub store: StoreSettings,
}

/// Direct page fetching behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// Maximum characters kept per page
    #[serde(rename = "content-cap")]
    pub content_cap: usize,

    /// Maximum number of sitemap URLs fetched per run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Fixed pause between page fetches (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            content_cap: DEFAULT_CONTENT_CAP,
            max_pages: 50,
            request_delay_ms: 500,
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Sitemap resolution behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitemapSettings {
    /// How many levels of nested sitemap indexes are followed
    #[serde(rename = "max-depth")]
    pub max_depth: u32,
}

impl Default for SitemapSettings {
    fn default() -> Self {
        Self { max_depth: 5 }
    }
}

/// Crawling service tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlServiceSettings {
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Page limit used when the CLI doesn't pass one
    #[serde(rename = "default-limit")]
    pub default_limit: u32,
}

impl Default for CrawlServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.firecrawl.dev".to_string(),
            poll_interval_ms: 2000,
            default_limit: 100,
        }
    }
}

/// Store tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub table: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            table: "content".to_string(),
        }
    }
}
