//! Crawl pipeline: delegate discovery to the crawling service, persist results

use crate::config::{Config, CrawlServiceConfig};
use crate::crawl_service::client::CrawlServiceClient;
use crate::crawl_service::types::CrawledDocument;
use crate::crawler::truncate_chars;
use crate::output::{Pipeline, RunReport};
use crate::storage::{
    persist_rows, ContentRow, ContentStore, RestStore, RowMetadata, CONTENT_TYPE_WEBPAGE,
    SCRAPE_TYPE_CRAWL, SOURCE_CRAWL_SERVICE,
};
use crate::IngestError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Maps a crawled document to a `content` row
///
/// Title falls back to the source URL, then to `"Untitled"`; the URL is the
/// source URL, else the reported URL. Markdown is truncated to `cap` chars.
pub fn document_to_row(
    org_id: &str,
    document: &CrawledDocument,
    cap: usize,
    scraped_at: DateTime<Utc>,
) -> ContentRow {
    let metadata = &document.metadata;
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

    let url = non_empty(&metadata.source_url).or_else(|| non_empty(&metadata.url));
    let title = non_empty(&metadata.title)
        .or_else(|| non_empty(&metadata.source_url))
        .unwrap_or_else(|| "Untitled".to_string());

    let raw_content = truncate_chars(document.markdown.clone().unwrap_or_default(), cap);

    ContentRow {
        org_id: org_id.to_string(),
        title,
        url,
        content_type: CONTENT_TYPE_WEBPAGE.to_string(),
        raw_content,
        metadata: RowMetadata {
            language: metadata.language.clone(),
            description: metadata.description.clone(),
            status_code: metadata.status_code,
            ..RowMetadata::new(SOURCE_CRAWL_SERVICE, SCRAPE_TYPE_CRAWL, scraped_at)
        },
    }
}

/// Drives one crawl-service ingest run
pub struct CrawlIngest {
    client: CrawlServiceClient,
    store: Arc<dyn ContentStore>,
    content_cap: usize,
}

impl CrawlIngest {
    pub fn new(
        config: &Config,
        service: &CrawlServiceConfig,
        store: Arc<dyn ContentStore>,
    ) -> Result<Self, IngestError> {
        Ok(Self {
            client: CrawlServiceClient::new(service)?,
            store,
            content_cap: config.scrape.content_cap,
        })
    }

    /// Crawls `url` (up to `limit` pages) and inserts one row per document
    ///
    /// A crawl that fails or returns no documents ends the run with nothing
    /// inserted; the reason is recorded in the report.
    pub async fn run(&self, url: &str, org_id: &str, limit: u32) -> RunReport {
        tracing::info!("Starting crawl ingest for org {}", org_id);
        tracing::info!("Target URL: {} (limit: {} pages)", url, limit);

        let mut report = RunReport::new(Pipeline::CrawlService, url);

        let outcome = match self.client.crawl(url, limit).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Crawl failed: {}", e);
                report.aborted = Some(e.to_string());
                return report;
            }
        };

        report.urls_discovered = outcome.documents.len();
        report.credits_used = Some(outcome.credits_used);

        if outcome.documents.is_empty() {
            tracing::warn!("No pages were crawled");
            report.aborted = Some("No pages were crawled".to_string());
            return report;
        }

        tracing::info!(
            "Crawl completed: status {}, {}/{} pages, {} credits used",
            outcome.status,
            outcome.completed,
            outcome.total,
            outcome.credits_used
        );

        let scraped_at = Utc::now();
        let rows: Vec<ContentRow> = outcome
            .documents
            .iter()
            .map(|document| document_to_row(org_id, document, self.content_cap, scraped_at))
            .collect();
        report.pages_extracted = rows.len();

        report.persist = persist_rows(self.store.as_ref(), &rows).await;

        tracing::info!(
            "Done: crawled {} pages, saved {}",
            report.pages_extracted,
            report.rows_inserted()
        );

        report
    }
}

/// Runs a crawl ingest against the configured remote store
pub async fn run_crawl_ingest(
    config: &Config,
    service: &CrawlServiceConfig,
    url: &str,
    org_id: &str,
    limit: u32,
) -> Result<RunReport, IngestError> {
    let store = RestStore::new(&config.store)?;
    let ingest = CrawlIngest::new(config, service, Arc::new(store))?;
    Ok(ingest.run(url, org_id, limit).await)
}
