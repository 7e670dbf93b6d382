//! Sitemap pipeline coordinator
//!
//! This module drives one sitemap ingest run:
//! - Resolving the sitemap tree into page URLs
//! - Fetching and extracting each page, with a fixed pause in between
//! - Handing the extracted pages to the persistence sink

use crate::config::Config;
use crate::crawler::sitemap::SitemapResolver;
use crate::crawler::{build_http_client, scrape_page};
use crate::output::{Pipeline, RunReport, SkippedPage};
use crate::storage::{persist_rows, ContentRow, ContentStore, RestStore};
use crate::IngestError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Main sitemap pipeline structure
pub struct SitemapCoordinator {
    config: Arc<Config>,
    client: Client,
    store: Arc<dyn ContentStore>,
}

impl SitemapCoordinator {
    /// Creates a new coordinator writing to the given store
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapCoordinator)` - Successfully created coordinator
    /// * `Err(IngestError)` - The HTTP client could not be built
    pub fn new(config: Config, store: Arc<dyn ContentStore>) -> Result<Self, IngestError> {
        let client = build_http_client(&config.scrape)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            store,
        })
    }

    /// Runs the pipeline for one sitemap
    ///
    /// Failures are reported, never propagated: a root sitemap that cannot be
    /// resolved ends the run with nothing inserted, a page that cannot be
    /// fetched is skipped, and a refused insert doesn't stop the others.
    pub async fn run(&self, sitemap_url: &str, org_id: &str) -> RunReport {
        tracing::info!("Starting sitemap ingest for org {}", org_id);
        tracing::info!("Sitemap URL: {}", sitemap_url);

        let mut report = RunReport::new(Pipeline::Sitemap, sitemap_url);

        let resolver = SitemapResolver::new(&self.client, self.config.sitemap.max_depth);
        let resolution = match resolver.resolve(sitemap_url).await {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::error!("Error fetching sitemap: {}", e);
                report.aborted = Some(e.to_string());
                return report;
            }
        };

        report.urls_discovered = resolution.urls.len();
        report.sitemap_failures = resolution.failures;

        if resolution.urls.is_empty() {
            tracing::warn!("No URLs found in sitemap");
            report.aborted = Some("No URLs found in sitemap".to_string());
            return report;
        }

        let limit = resolution.urls.len().min(self.config.scrape.max_pages);
        if limit < resolution.urls.len() {
            tracing::info!(
                "Limiting run to the first {} of {} URLs",
                limit,
                resolution.urls.len()
            );
        }

        let delay = Duration::from_millis(self.config.scrape.request_delay_ms);
        let cap = self.config.scrape.content_cap;
        let mut records = Vec::with_capacity(limit);

        for (index, url) in resolution.urls.iter().take(limit).enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            tracing::info!("[{}/{}] Scraping: {}", index + 1, limit, url);
            report.pages_attempted += 1;

            match scrape_page(&self.client, url, cap).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Error scraping {}: {}", url, e);
                    report.skipped_pages.push(SkippedPage {
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.pages_extracted = records.len();

        if records.is_empty() {
            tracing::warn!("No content was successfully scraped");
            return report;
        }

        let rows: Vec<ContentRow> = records
            .iter()
            .map(|record| ContentRow::from_page_record(org_id, record))
            .collect();

        report.persist = persist_rows(self.store.as_ref(), &rows).await;

        tracing::info!(
            "Done: scraped {} pages, saved {}",
            report.pages_extracted,
            report.rows_inserted()
        );

        report
    }
}

/// Runs a sitemap ingest against the configured remote store
///
/// # Example
///
/// ```no_run
/// use site_ingest::config::load_config;
/// use site_ingest::crawler::run_sitemap_ingest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config()?;
/// let report = run_sitemap_ingest(config, "https://example.com/sitemap.xml", "org-id").await?;
/// println!("Inserted {} rows", report.rows_inserted());
/// # Ok(())
/// # }
/// ```
pub async fn run_sitemap_ingest(
    config: Config,
    sitemap_url: &str,
    org_id: &str,
) -> Result<RunReport, IngestError> {
    let store = RestStore::new(&config.store)?;
    let coordinator = SitemapCoordinator::new(config, Arc::new(store))?;
    Ok(coordinator.run(sitemap_url, org_id).await)
}
