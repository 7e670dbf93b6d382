//! Row layout of the remote `content` collection

use crate::crawler::PageRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Every row this crate writes is a web page
pub const CONTENT_TYPE_WEBPAGE: &str = "webpage";

/// `metadata.source` for rows built by the sitemap pipeline
pub const SOURCE_SITEMAP: &str = "sitemap_scraper";

/// `metadata.scrape_type` for rows built by the sitemap pipeline
pub const SCRAPE_TYPE_SITEMAP: &str = "full_sitemap";

/// `metadata.source` for rows built from crawl service documents
pub const SOURCE_CRAWL_SERVICE: &str = "firecrawl";

/// `metadata.scrape_type` for rows built from crawl service documents
pub const SCRAPE_TYPE_CRAWL: &str = "full_crawl";

/// Format of `metadata.scraped_at`
pub const SCRAPED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the remote `content` collection
///
/// The store owns the row after insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRow {
    pub org_id: String,
    pub title: String,
    pub url: Option<String>,
    pub content_type: String,
    pub raw_content: String,
    pub metadata: RowMetadata,
}

/// The `metadata` JSON column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowMetadata {
    pub source: String,
    pub scrape_type: String,
    pub scraped_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl RowMetadata {
    /// Metadata with only the required fields set
    pub fn new(source: &str, scrape_type: &str, scraped_at: DateTime<Utc>) -> Self {
        Self {
            source: source.to_string(),
            scrape_type: scrape_type.to_string(),
            scraped_at: format_scraped_at(scraped_at),
            language: None,
            description: None,
            status_code: None,
        }
    }
}

impl ContentRow {
    /// Builds the row for a page extracted by the sitemap pipeline
    pub fn from_page_record(org_id: &str, record: &PageRecord) -> Self {
        Self {
            org_id: org_id.to_string(),
            title: record.title.clone(),
            url: Some(record.url.clone()),
            content_type: CONTENT_TYPE_WEBPAGE.to_string(),
            raw_content: record.content.clone(),
            metadata: RowMetadata::new(SOURCE_SITEMAP, SCRAPE_TYPE_SITEMAP, record.discovered_at),
        }
    }

    /// URL used in log lines; falls back to the title when the row has none
    pub fn label(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.title)
    }
}

pub fn format_scraped_at(at: DateTime<Utc>) -> String {
    at.format(SCRAPED_AT_FORMAT).to_string()
}
