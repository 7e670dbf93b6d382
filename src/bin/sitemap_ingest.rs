//! Sitemap ingest entry point
//!
//! Resolves a sitemap, scrapes each listed page and saves the text to the
//! content store.

use anyhow::Context;
use clap::Parser;
use site_ingest::config::load_config;
use site_ingest::crawler::run_sitemap_ingest;
use site_ingest::logging::setup_logging;
use site_ingest::output::print_report;

/// Scrape every page listed in a sitemap into the content store
///
/// Requires SUPABASE_URL and SUPABASE_SERVICE_KEY in the environment
/// (or a .env file).
#[derive(Parser, Debug)]
#[command(name = "sitemap-ingest")]
#[command(version)]
#[command(about = "Scrape every page listed in a sitemap into the content store")]
#[command(after_help = "Example:\n  sitemap-ingest https://docs.example.com/sitemap.xml 123e4567-e89b-12d3-a456-426614174000")]
struct Cli {
    /// Sitemap or sitemap index URL
    #[arg(value_name = "SITEMAP_URL")]
    sitemap_url: String,

    /// Organization the rows belong to
    #[arg(value_name = "ORG_ID")]
    org_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging();

    let config = load_config().context("Failed to load configuration")?;
    tracing::info!(
        "Configuration loaded (max pages: {}, delay: {}ms)",
        config.scrape.max_pages,
        config.scrape.request_delay_ms
    );

    let report = run_sitemap_ingest(config, &cli.sitemap_url, &cli.org_id)
        .await
        .context("Failed to start sitemap ingest")?;

    print_report(&report);

    if !report.is_clean() {
        tracing::warn!("Run finished with partial failures");
    }

    Ok(())
}
