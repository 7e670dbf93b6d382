//! PostgREST-backed content store
//!
//! Rows are inserted one at a time with `POST {base}/rest/v1/{table}`.

use crate::config::StoreConfig;
use crate::storage::traits::{ContentStore, StoreError, StoreResult};
use crate::storage::ContentRow;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

/// Content store speaking the PostgREST row-insert protocol
pub struct RestStore {
    client: Client,
    insert_url: String,
}

impl RestStore {
    /// Creates a store client for the configured collection
    ///
    /// The service key is sent both as `apikey` and as a bearer token.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.service_key)
                .map_err(|e| StoreError::InvalidCredential(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.service_key))
                .map_err(|e| StoreError::InvalidCredential(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        let insert_url = format!(
            "{}/rest/v1/{}",
            config.base_url.trim_end_matches('/'),
            config.table
        );

        Ok(Self { client, insert_url })
    }

    /// Endpoint rows are posted to
    pub fn insert_url(&self) -> &str {
        &self.insert_url
    }
}

#[async_trait]
impl ContentStore for RestStore {
    async fn insert_row(&self, row: &ContentRow) -> StoreResult<()> {
        let response = self
            .client
            .post(&self.insert_url)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));

        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
