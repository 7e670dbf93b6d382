//! Storage traits and error types
//!
//! This module defines the trait interface for content store backends and
//! associated error types.

use crate::storage::ContentRow;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store rejected insert (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid store credential: {0}")]
    InvalidCredential(String),

    #[error("Store error: {0}")]
    Other(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A remote collection rows can be inserted into
///
/// Each call inserts exactly one row; there is no bulk or transactional path.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Inserts a single row
    async fn insert_row(&self, row: &ContentRow) -> StoreResult<()>;
}

