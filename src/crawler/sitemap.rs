//! Sitemap resolution
//!
//! Turns a sitemap URL into the flat list of page URLs it describes. A plain
//! `<urlset>` yields its `<url><loc>` entries; a `<sitemapindex>` is followed
//! into each `<sitemap><loc>` child and the children's URLs are concatenated
//! in document order.

use crate::crawler::fetcher::fetch_document;
use crate::{IngestError, ParseError};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::sync::Arc;

/// `<loc>` entries of a single sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Page URLs from `<url><loc>`
    pub urls: Vec<String>,

    /// Nested sitemap URLs from `<sitemap><loc>`
    pub sitemaps: Vec<String>,
}

/// A nested sitemap that contributed no URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapFailure {
    pub url: String,
    pub reason: String,
}

/// Result of resolving a sitemap tree
#[derive(Debug, Clone, Default)]
pub struct SitemapResolution {
    /// Page URLs in document order, not deduplicated
    pub urls: Vec<String>,

    /// Nested sitemaps that failed or were skipped by the recursion guard
    pub failures: Vec<SitemapFailure>,
}

/// Parses one sitemap or sitemap index document
///
/// Elements are matched by local name, so namespaced and bare documents parse
/// the same way.
///
/// # Example
///
/// ```
/// use site_ingest::crawler::parse_sitemap;
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/a</loc></url>
/// </urlset>"#;
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(doc.urls, vec!["https://example.com/a".to_string()]);
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document = SitemapDocument::default();
    let mut in_url = false;
    let mut in_sitemap = false;
    let mut loc: Option<String> = None;
    let mut depth: usize = 0;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"url" => in_url = true,
                    b"sitemap" => in_sitemap = true,
                    b"loc" if in_url || in_sitemap => loc = Some(String::new()),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(buffer) = loc.as_mut() {
                    let text = e.unescape().map_err(|err| err.to_string())?;
                    buffer.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(buffer) = loc.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                match e.local_name().as_ref() {
                    b"loc" => {
                        if let Some(value) = loc.take() {
                            let value = value.trim().to_string();
                            if value.is_empty() {
                                continue;
                            }
                            if in_url {
                                document.urls.push(value);
                            } else if in_sitemap {
                                document.sitemaps.push(value);
                            }
                        }
                    }
                    b"url" => in_url = false,
                    b"sitemap" => in_sitemap = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err("unexpected end of document".to_string());
    }

    Ok(document)
}

/// Resolves sitemap URLs into page URLs
///
/// Recursion through sitemap indexes is bounded by `max_depth` and by the
/// chain of indexes leading to each child, so a self-referencing index
/// terminates with a reported failure instead of looping. A sitemap listed
/// more than once outside such a chain is resolved every time.
pub struct SitemapResolver<'a> {
    client: &'a Client,
    max_depth: u32,
}

/// A sitemap waiting to be resolved, with the indexes that led to it
struct PendingSitemap {
    url: String,
    /// Index URLs from the root down to the parent of `url`
    ancestors: Arc<Vec<String>>,
}

impl PendingSitemap {
    fn depth(&self) -> u32 {
        self.ancestors.len() as u32
    }
}

impl<'a> SitemapResolver<'a> {
    pub fn new(client: &'a Client, max_depth: u32) -> Self {
        Self { client, max_depth }
    }

    /// Resolves `sitemap_url` into a flat, ordered list of page URLs
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapResolution)` - The root sitemap was fetched and parsed;
    ///   nested failures are listed in `failures`
    /// * `Err(IngestError)` - The root sitemap could not be fetched or parsed
    pub async fn resolve(&self, sitemap_url: &str) -> Result<SitemapResolution, IngestError> {
        let mut resolution = SitemapResolution::default();

        // Depth-first, children pushed in reverse so they pop in document order
        let mut pending = vec![PendingSitemap {
            url: sitemap_url.to_string(),
            ancestors: Arc::new(Vec::new()),
        }];

        while let Some(entry) = pending.pop() {
            let depth = entry.depth();
            let PendingSitemap { url, ancestors } = entry;

            if ancestors.contains(&url) {
                tracing::warn!("Sitemap {} references itself, skipping cycle", url);
                resolution.failures.push(SitemapFailure {
                    url,
                    reason: "cycle in sitemap index".to_string(),
                });
                continue;
            }

            tracing::info!("Fetching sitemap from: {}", url);
            let document = match self.load(&url).await {
                Ok(document) => document,
                Err(e) if depth == 0 => return Err(e),
                Err(e) => {
                    tracing::warn!("Error fetching sitemap {}: {}", url, e);
                    resolution.failures.push(SitemapFailure {
                        url,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !document.urls.is_empty() {
                tracing::info!("Found {} URLs in sitemap {}", document.urls.len(), url);
                resolution.urls.extend(document.urls);
                continue;
            }

            if document.sitemaps.is_empty() {
                tracing::debug!("Sitemap {} lists no URLs", url);
                continue;
            }

            if depth >= self.max_depth {
                tracing::warn!(
                    "Sitemap index {} is at max depth {}, not following {} children",
                    url,
                    self.max_depth,
                    document.sitemaps.len()
                );
                for child in document.sitemaps {
                    resolution.failures.push(SitemapFailure {
                        url: child,
                        reason: format!("exceeds max depth {}", self.max_depth),
                    });
                }
                continue;
            }

            tracing::debug!(
                "Sitemap index {} lists {} nested sitemaps",
                url,
                document.sitemaps.len()
            );

            let mut chain = Vec::with_capacity(ancestors.len() + 1);
            chain.extend(ancestors.iter().cloned());
            chain.push(url);
            let chain = Arc::new(chain);

            for child in document.sitemaps.into_iter().rev() {
                pending.push(PendingSitemap {
                    url: child,
                    ancestors: Arc::clone(&chain),
                });
            }
        }

        tracing::info!("Resolved {} URLs from {}", resolution.urls.len(), sitemap_url);
        Ok(resolution)
    }

    async fn load(&self, url: &str) -> Result<SitemapDocument, IngestError> {
        let fetched = fetch_document(self.client, url).await?;
        let document = parse_sitemap(&fetched.body).map_err(|message| ParseError::Xml {
            url: url.to_string(),
            message,
        })?;
        Ok(document)
    }
}
