//! Storage module for persisting extracted pages
//!
//! This module handles writing rows to the remote content store:
//! - The [`ContentStore`] seam and its PostgREST implementation
//! - The row layout of the `content` collection
//! - The persistence sink that inserts a batch row by row

mod rest;
mod schema;
mod traits;

pub use rest::RestStore;
pub use schema::{
    format_scraped_at, ContentRow, RowMetadata, CONTENT_TYPE_WEBPAGE, SCRAPED_AT_FORMAT,
    SCRAPE_TYPE_CRAWL, SCRAPE_TYPE_SITEMAP, SOURCE_CRAWL_SERVICE, SOURCE_SITEMAP,
};
pub use traits::{ContentStore, StoreError, StoreResult};

/// A row the store refused
#[derive(Debug, Clone)]
pub struct InsertFailure {
    /// URL (or title) of the row
    pub label: String,
    pub error: String,
}

/// Outcome of persisting a batch of rows
#[derive(Debug, Clone, Default)]
pub struct PersistSummary {
    pub attempted: usize,
    pub inserted: usize,
    pub failures: Vec<InsertFailure>,
}

/// Inserts each row independently
///
/// A failed insert is logged and recorded; the remaining rows are still
/// attempted. Nothing is retried.
///
/// # Returns
///
/// A [`PersistSummary`] whose `inserted` is the number of successful inserts
pub async fn persist_rows(store: &dyn ContentStore, rows: &[ContentRow]) -> PersistSummary {
    tracing::info!("Saving {} pages to the content store", rows.len());

    let mut summary = PersistSummary {
        attempted: rows.len(),
        ..PersistSummary::default()
    };

    for row in rows {
        match store.insert_row(row).await {
            Ok(()) => {
                summary.inserted += 1;
                tracing::info!(
                    "[{}/{}] Saved: {}",
                    summary.inserted,
                    rows.len(),
                    row.title
                );
            }
            Err(e) => {
                tracing::error!("Error saving {}: {}", row.label(), e);
                summary.failures.push(InsertFailure {
                    label: row.label().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Successfully saved {}/{} pages",
        summary.inserted,
        summary.attempted
    );

    summary
}
