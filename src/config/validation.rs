use crate::config::types::{Config, CrawlServiceSettings, ScrapeSettings, StoreConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_store_config(&config.store)?;
    validate_scrape_settings(&config.scrape)?;
    validate_crawl_service_settings(&config.crawl_service)?;
    Ok(())
}

/// Validates the store connection
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid store URL: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Store URL '{}' must use http or https",
            config.base_url
        )));
    }

    if config.table.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store table cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates page fetching settings
fn validate_scrape_settings(settings: &ScrapeSettings) -> Result<(), ConfigError> {
    if settings.content_cap < 1 {
        return Err(ConfigError::Validation(format!(
            "content_cap must be >= 1, got {}",
            settings.content_cap
        )));
    }

    if settings.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            settings.max_pages
        )));
    }

    if settings.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            settings.request_timeout_secs
        )));
    }

    if settings.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawling service tunables
fn validate_crawl_service_settings(settings: &CrawlServiceSettings) -> Result<(), ConfigError> {
    Url::parse(&settings.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid crawl service URL: {}", e)))?;

    if settings.default_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "default_limit must be >= 1, got {}",
            settings.default_limit
        )));
    }

    Ok(())
}
