//! Wire types of the crawling service API

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /v1/crawl`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    pub url: String,
    pub limit: u32,
    pub scrape_options: ScrapeOptions,
}

/// Per-page output options
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    pub formats: Vec<String>,
    pub only_main_content: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: vec!["markdown".to_string()],
            only_main_content: true,
        }
    }
}

/// Response of `POST /v1/crawl`
#[derive(Debug, Clone, Deserialize)]
pub struct StartCrawlResponse {
    #[serde(default)]
    pub success: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

/// Response of `GET /v1/crawl/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlStatusResponse {
    pub success: Option<bool>,
    pub status: String,
    pub total: u64,
    pub completed: u64,
    pub credits_used: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<CrawledDocument>,
    pub error: Option<String>,
    /// Absolute URL of the next page of results, when the job has more
    pub next: Option<String>,
}

/// One crawled page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawledDocument {
    pub markdown: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: DocumentMetadata,
}

/// Page metadata reported by the crawling service
///
/// String fields may arrive as arrays when a page repeats a meta tag; the
/// first string wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    #[serde(deserialize_with = "string_or_first")]
    pub title: Option<String>,

    #[serde(rename = "sourceURL", deserialize_with = "string_or_first")]
    pub source_url: Option<String>,

    #[serde(deserialize_with = "string_or_first")]
    pub url: Option<String>,

    #[serde(deserialize_with = "string_or_first")]
    pub language: Option<String>,

    #[serde(deserialize_with = "string_or_first")]
    pub description: Option<String>,

    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
}

/// A finished crawl job
#[derive(Debug, Clone, Default)]
pub struct CrawlJobOutcome {
    pub id: String,
    pub status: String,
    pub total: u64,
    pub completed: u64,
    pub credits_used: u64,
    pub documents: Vec<CrawledDocument>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_first<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => items.into_iter().find_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        }),
        _ => None,
    })
}
