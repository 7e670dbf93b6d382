//! Crawler module for the sitemap pipeline
//!
//! This module contains the direct-fetch side of Site-Ingest, including:
//! - HTTP fetching with error classification
//! - Sitemap and sitemap index resolution
//! - HTML main-content extraction
//! - Pipeline coordination

mod coordinator;
mod fetcher;
mod parser;
mod sitemap;

pub use coordinator::{run_sitemap_ingest, SitemapCoordinator};
pub use fetcher::{build_http_client, fetch_document, FetchedDocument};
pub use parser::{collapse_whitespace, extract_page, truncate_chars, ExtractedPage};
pub use sitemap::{
    parse_sitemap, SitemapDocument, SitemapFailure, SitemapResolution, SitemapResolver,
};

use crate::{IngestError, ParseError};
use chrono::{DateTime, Utc};
use reqwest::Client;
use url::Url;

/// A page extracted by the sitemap pipeline, ready to become a row
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    /// At most the configured content cap, in characters
    pub content: String,
    pub discovered_at: DateTime<Utc>,
}

/// Fetches one page and extracts its title and text
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The page URL
/// * `cap` - Maximum characters of content to keep
///
/// # Returns
///
/// * `Ok(PageRecord)` - The page was fetched and extracted
/// * `Err(IngestError)` - The URL was invalid or the fetch failed
pub async fn scrape_page(client: &Client, url: &str, cap: usize) -> Result<PageRecord, IngestError> {
    let parsed_url = Url::parse(url).map_err(|e| ParseError::Url {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let fetched = fetch_document(client, url).await?;
    let page = extract_page(&fetched.body, &parsed_url, cap);

    tracing::debug!(
        "Extracted {} chars from {} ({})",
        page.content.chars().count(),
        url,
        fetched.content_type
    );

    Ok(PageRecord {
        title: page.title,
        url: url.to_string(),
        content: page.content,
        discovered_at: Utc::now(),
    })
}
