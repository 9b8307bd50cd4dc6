pub mod eda_config;
pub mod scrape_config;

pub use eda_config::*;
pub use scrape_config::*;

use anyhow::Result;
use std::env;
use std::path::Path;
use tracing::{info, warn};

pub const SCRAPE_CONFIG_ENV: &str = "SCRAPE_CONFIG";
pub const EDA_CONFIG_ENV: &str = "EDA_CONFIG";
pub const DEFAULT_SCRAPE_CONFIG: &str = "src/configs/amazon_in.toml";
pub const DEFAULT_EDA_CONFIG: &str = "src/configs/eda.toml";

/// Resolve the scrape config path from the environment and load it, falling back to defaults
/// when the file does not exist.
pub fn load_scrape_config() -> Result<ScrapeConfig> {
    let path = env::var(SCRAPE_CONFIG_ENV).unwrap_or_else(|_| DEFAULT_SCRAPE_CONFIG.to_string());
    if !Path::new(&path).exists() {
        warn!("Scrape config not found at {}, using built-in defaults", path);
        return Ok(ScrapeConfig::default());
    }
    let config = ScrapeConfig::from_file(&path)?;
    info!("Loaded scrape config from {}: {} ({} pages)", path, config.site.name, config.scraping.max_pages);
    Ok(config)
}

pub fn load_eda_config() -> Result<EdaConfig> {
    let path = env::var(EDA_CONFIG_ENV).unwrap_or_else(|_| DEFAULT_EDA_CONFIG.to_string());
    if !Path::new(&path).exists() {
        warn!("EDA config not found at {}, using built-in defaults", path);
        return Ok(EdaConfig::default());
    }
    let config = EdaConfig::from_file(&path)?;
    info!("Loaded EDA config from {}", path);
    Ok(config)
}
