//! External crawling service integration
//!
//! The crawl pipeline hands discovery, fetching and rendering to a hosted
//! crawling API and only persists what comes back.

mod client;
mod pipeline;
mod types;

pub use client::CrawlServiceClient;
pub use pipeline::{document_to_row, run_crawl_ingest, CrawlIngest};
pub use types::{
    CrawlJobOutcome, CrawlRequest, CrawlStatusResponse, CrawledDocument, DocumentMetadata,
    ScrapeOptions, StartCrawlResponse,
};

use thiserror::Error;

/// Errors talking to the crawling service
#[derive(Debug, Error)]
pub enum CrawlServiceError {
    #[error("Crawl request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Crawl rejected: {0}")]
    Rejected(String),

    #[error("Crawl job {id} ended with status {status}: {message}")]
    JobFailed {
        id: String,
        status: String,
        message: String,
    },

    #[error("Malformed crawl service response: {0}")]
    Malformed(String),

    #[error("Invalid crawl service API key: {0}")]
    InvalidCredential(String),
}
