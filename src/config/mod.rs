//! Configuration module for Site-Ingest
//!
//! Connection details and credentials come from environment variables; the
//! crawl tunables (page cap, delays, timeouts) have defaults that an optional
//! TOML settings file can override.
//!
//! # Example
//!
//! ```no_run
//! use site_ingest::config::load_config;
//!
//! let config = load_config().unwrap();
//! println!("Inserting into table: {}", config.store.table);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlServiceConfig, CrawlServiceSettings, ScrapeSettings, Settings, SitemapSettings,
    StoreConfig, StoreSettings, DEFAULT_CONTENT_CAP, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{
    load_config, load_config_from, load_crawl_service_config, load_crawl_service_config_from,
    load_settings, CRAWL_API_KEY_VAR, CRAWL_API_URL_VAR, SETTINGS_PATH_VAR, STORE_KEY_VAR,
    STORE_URL_VAR,
};

pub use validation::validate;
