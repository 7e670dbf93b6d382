//! Crawl ingest entry point
//!
//! Hands a site to the crawling service and saves every returned page to the
//! content store.

use anyhow::Context;
use clap::Parser;
use site_ingest::config::{load_config, load_crawl_service_config};
use site_ingest::crawl_service::run_crawl_ingest;
use site_ingest::logging::setup_logging;
use site_ingest::output::print_report;

/// Crawl a site through the crawling service into the content store
///
/// Requires FIRECRAWL_API_KEY, SUPABASE_URL and SUPABASE_SERVICE_KEY in the
/// environment (or a .env file).
#[derive(Parser, Debug)]
#[command(name = "crawl-ingest")]
#[command(version)]
#[command(about = "Crawl a site through the crawling service into the content store")]
#[command(after_help = "Example:\n  crawl-ingest https://docs.example.com abc123-org-id 50\n\nDefault limit is 100 pages")]
struct Cli {
    /// Root URL to crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Organization the rows belong to
    #[arg(value_name = "ORG_ID")]
    org_id: String,

    /// Maximum number of pages the service should crawl
    #[arg(value_name = "LIMIT")]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging();

    let config = load_config().context("Failed to load configuration")?;
    let service = load_crawl_service_config(&config)
        .context("Failed to load crawl service configuration")?;

    let limit = cli.limit.unwrap_or(config.crawl_service.default_limit);

    let report = run_crawl_ingest(&config, &service, &cli.url, &cli.org_id, limit)
        .await
        .context("Failed to start crawl ingest")?;

    print_report(&report);

    if !report.is_clean() {
        tracing::warn!("Run finished with partial failures");
    }

    Ok(())
}
