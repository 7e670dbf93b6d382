//! HTTP client for the crawling service
//!
//! A crawl is a job: it is started with `POST /v1/crawl` and then polled with
//! `GET /v1/crawl/{id}` until it completes or fails.

use crate::config::CrawlServiceConfig;
use crate::crawl_service::types::{
    CrawlJobOutcome, CrawlRequest, CrawlStatusResponse, ScrapeOptions, StartCrawlResponse,
};
use crate::crawl_service::CrawlServiceError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;

/// Client for one crawling service account
pub struct CrawlServiceClient {
    client: Client,
    base_url: String,
    poll_interval: Duration,
}

impl CrawlServiceClient {
    /// Creates a client authenticated with the configured API key
    pub fn new(config: &CrawlServiceConfig) -> Result<Self, CrawlServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| CrawlServiceError::InvalidCredential(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// Starts a crawl job and returns its id
    pub async fn start_crawl(&self, url: &str, limit: u32) -> Result<String, CrawlServiceError> {
        let request = CrawlRequest {
            url: url.to_string(),
            limit,
            scrape_options: ScrapeOptions::default(),
        };

        let response = self
            .client
            .post(format!("{}/v1/crawl", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let started: StartCrawlResponse = read_json(response).await?;

        if !status.is_success() || !started.success {
            return Err(CrawlServiceError::Rejected(
                started
                    .error
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            ));
        }

        started
            .id
            .ok_or_else(|| CrawlServiceError::Malformed("crawl started without a job id".into()))
    }

    /// Fetches the current state of a crawl job
    pub async fn crawl_status(&self, id: &str) -> Result<CrawlStatusResponse, CrawlServiceError> {
        self.get_status(&format!("{}/v1/crawl/{}", self.base_url, id))
            .await
    }

    async fn get_status(&self, url: &str) -> Result<CrawlStatusResponse, CrawlServiceError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body: CrawlStatusResponse = read_json(response).await?;

        if !status.is_success() || body.success == Some(false) {
            return Err(CrawlServiceError::Rejected(
                body.error
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            ));
        }

        Ok(body)
    }

    /// Runs a crawl to completion
    ///
    /// Polls at the configured interval until the job reports `completed`,
    /// then follows `next` until every page of results has been read.
    /// A `failed` or `cancelled` job is an error, and so is a missing or
    /// unrecognized status. There is no overall timeout.
    pub async fn crawl(&self, url: &str, limit: u32) -> Result<CrawlJobOutcome, CrawlServiceError> {
        let id = self.start_crawl(url, limit).await?;
        tracing::info!("Crawl job {} started for {}", id, url);

        loop {
            let state = self.crawl_status(&id).await?;

            match state.status.as_str() {
                "completed" => {
                    let next = state.next.clone();
                    let mut outcome = CrawlJobOutcome {
                        id,
                        status: state.status,
                        total: state.total,
                        completed: state.completed,
                        credits_used: state.credits_used,
                        documents: state.data,
                    };
                    self.collect_remaining(next, &mut outcome).await?;
                    return Ok(outcome);
                }
                "failed" | "cancelled" => {
                    return Err(CrawlServiceError::JobFailed {
                        id,
                        status: state.status,
                        message: state.error.unwrap_or_else(|| "Unknown error".to_string()),
                    });
                }
                in_progress @ ("scraping" | "processing") => {
                    tracing::debug!(
                        "Crawl job {} is {}: {}/{} pages",
                        id,
                        in_progress,
                        state.completed,
                        state.total
                    );
                }
                "" => {
                    return Err(CrawlServiceError::Malformed(format!(
                        "crawl job {} status response has no status",
                        id
                    )));
                }
                other => {
                    return Err(CrawlServiceError::Malformed(format!(
                        "crawl job {} has unknown status {:?}",
                        id, other
                    )));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Appends the documents of every further result page to `outcome`
    async fn collect_remaining(
        &self,
        mut next: Option<String>,
        outcome: &mut CrawlJobOutcome,
    ) -> Result<(), CrawlServiceError> {
        let mut seen = HashSet::new();

        while let Some(page_url) = next.take() {
            let page_url = if page_url.starts_with('/') {
                format!("{}{}", self.base_url, page_url)
            } else {
                page_url
            };

            if !seen.insert(page_url.clone()) {
                tracing::warn!(
                    "Crawl job {} repeats result page {}, stopping",
                    outcome.id,
                    page_url
                );
                break;
            }

            let page = self.get_status(&page_url).await?;
            tracing::debug!(
                "Crawl job {}: read {} more documents from {}",
                outcome.id,
                page.data.len(),
                page_url
            );
            outcome.documents.extend(page.data);
            next = page.next;
        }

        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CrawlServiceError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| CrawlServiceError::Malformed(e.to_string()))
}
