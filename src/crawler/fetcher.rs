//! HTTP fetcher implementation
//!
//! This module handles the direct HTTP requests made by the sitemap pipeline:
//! - Building the HTTP client with a browser-like user agent and timeout
//! - GET requests for sitemap documents and pages
//! - Error classification into [`FetchError`]

use crate::config::ScrapeSettings;
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// A successfully fetched document
#[derive(Debug)]
pub struct FetchedDocument {
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: String,
    /// Response body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_ingest::config::ScrapeSettings;
/// use site_ingest::crawler::build_http_client;
///
/// let client = build_http_client(&ScrapeSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &ScrapeSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .connect_timeout(Duration::from_secs(settings.request_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body
///
/// Any non-2xx status is a [`FetchError::Status`]. Nothing is retried.
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | HTTP 4xx/5xx | `Status` |
/// | Timeout | `Timeout` |
/// | Connection refused, DNS, TLS | `Connect` |
/// | Body read failure, other | `Network` |
pub async fn fetch_document(client: &Client, url: &str) -> Result<FetchedDocument, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(FetchedDocument {
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
