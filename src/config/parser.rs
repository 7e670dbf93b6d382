use crate::config::types::{Config, CrawlServiceConfig, Settings, StoreConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

pub const STORE_URL_VAR: &str = "SUPABASE_URL";
pub const STORE_KEY_VAR: &str = "SUPABASE_SERVICE_KEY";
pub const CRAWL_API_KEY_VAR: &str = "FIRECRAWL_API_KEY";
pub const CRAWL_API_URL_VAR: &str = "FIRECRAWL_API_URL";
pub const SETTINGS_PATH_VAR: &str = "SITE_INGEST_SETTINGS";

/// Loads a settings file from the given path
///
/// Every table and key is optional; anything left out keeps its default.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_ingest::config::load_settings;
///
/// let settings = load_settings(Path::new("ingest.toml")).unwrap();
/// println!("Max pages: {}", settings.scrape.max_pages);
/// ```
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

/// Loads the store configuration and tunables from the process environment
///
/// A `.env` file in the working directory is applied first when present.
pub fn load_config() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();
    load_config_from(|name| std::env::var(name).ok())
}

/// Loads the crawling service configuration from the process environment
pub fn load_crawl_service_config(config: &Config) -> Result<CrawlServiceConfig, ConfigError> {
    let _ = dotenvy::dotenv();
    load_crawl_service_config_from(|name| std::env::var(name).ok(), config)
}

/// Builds a validated [`Config`] from an arbitrary variable lookup
///
/// # Arguments
///
/// * `lookup` - Returns the value of a variable, or `None` when unset
///
/// # Returns
///
/// * `Ok(Config)` - All required variables were present and valid
/// * `Err(ConfigError)` - A variable was missing or a setting was invalid
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = require(&lookup, STORE_URL_VAR)?;
    let service_key = require(&lookup, STORE_KEY_VAR)?;

    let settings = match lookup(SETTINGS_PATH_VAR).filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            tracing::debug!("Loading settings from {}", path);
            load_settings(Path::new(&path))?
        }
        None => Settings::default(),
    };

    let config = Config {
        store: StoreConfig {
            base_url,
            service_key,
            table: settings.store.table,
        },
        scrape: settings.scrape,
        sitemap: settings.sitemap,
        crawl_service: settings.crawl_service,
    };

    validate(&config)?;

    Ok(config)
}

/// Builds a [`CrawlServiceConfig`] from an arbitrary variable lookup
///
/// `FIRECRAWL_API_URL` overrides the base URL from the settings file.
pub fn load_crawl_service_config_from<F>(
    lookup: F,
    config: &Config,
) -> Result<CrawlServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = require(&lookup, CRAWL_API_KEY_VAR)?;
    let base_url = lookup(CRAWL_API_URL_VAR)
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| config.crawl_service.base_url.clone());

    url::Url::parse(&base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid crawl service URL: {}", e)))?;

    Ok(CrawlServiceConfig {
        api_key,
        base_url,
        poll_interval_ms: config.crawl_service.poll_interval_ms,
    })
}

fn require<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
}
