//! Site-Ingest: page ingestion into a remote content store
//!
//! This crate fetches web pages, extracts their readable text and inserts one
//! row per page into a PostgREST-backed `content` table. Pages come from one of
//! two sources: a sitemap (resolved recursively and fetched directly), or an
//! external crawling service that returns already-rendered markdown.

pub mod config;
pub mod crawl_service;
pub mod crawler;
pub mod logging;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Site-Ingest operations
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Crawl service error: {0}")]
    CrawlService(#[from] crawl_service::CrawlServiceError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure to retrieve a single document over HTTP
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was addressed to
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Network { url, .. } => url,
        }
    }
}

/// Malformed document errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed XML in {url}: {message}")]
    Xml { url: String, message: String },

    #[error("Invalid URL {url}: {message}")]
    Url { url: String, message: String },
}

/// Result type alias for Site-Ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlServiceConfig};
pub use crawler::{PageRecord, SitemapCoordinator};
pub use output::RunReport;
pub use storage::{ContentRow, ContentStore, RestStore};
