//! Logging setup shared by the binaries

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "site_ingest=info,sitemap_ingest=info,crawl_ingest=info,warn";

/// Installs the global tracing subscriber
///
/// `RUST_LOG` takes precedence over [`DEFAULT_FILTER`].
pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
