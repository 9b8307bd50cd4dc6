use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the search-results collector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub site: SiteConfig,
    pub scraping: ScrapingConfig,
    pub headers: HeaderConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Target site and search query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
    pub query: String,
}

/// Pagination and pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    pub max_pages: u32,
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
}

/// Identification headers sent with every request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub user_agent: String,
    pub accept_language: String,
}

/// CSS selectors for a search-results page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub listing: String,
    pub title: String,
    pub price_whole: String,
    pub price_fraction: String,
    pub rating: String,
    pub specs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub raw_csv: String,
}

impl ScrapeConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scrape config file: {}", path.display()))?;
        let config: ScrapeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scrape config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scraping.validate()
    }
}

impl ScrapingConfig {
    /// Delay bounds in seconds, lower first.
    pub fn delay_range(&self) -> (f64, f64) {
        (self.min_delay_secs, self.max_delay_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.delay_range();
        if !(min >= 0.0 && max >= 0.0) {
            return Err(anyhow!("Delay bounds must be non-negative, got ({}, {})", min, max));
        }
        if !(min.is_finite() && max.is_finite()) || max > Duration::MAX.as_secs_f64() {
            return Err(anyhow!("Delay bounds must be finite durations, got ({}, {})", min, max));
        }
        if min > max {
            return Err(anyhow!("Minimum delay {} exceeds maximum delay {}", min, max));
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Amazon India".to_string(),
            base_url: "https://www.amazon.in/s".to_string(),
            query: "phone under 30k".to_string(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            max_pages: 15,
            min_delay_secs: 2.0,
            max_delay_secs: 5.0,
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:136.0) Gecko/20100101 Firefox/136.0"
                .to_string(),
            accept_language: "en-IN, en;q=0.9".to_string(),
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing: r#"div[data-component-type="s-search-result"]"#.to_string(),
            title: "h2".to_string(),
            price_whole: "span.a-price-whole".to_string(),
            price_fraction: "span.a-price-fraction".to_string(),
            rating: "span.a-icon-alt".to_string(),
            specs: "div.a-row.a-size-base.a-color-secondary".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_csv: "amazon_mobiles_under_30k.csv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = ScrapeConfig::default();
        assert_eq!(config.scraping.max_pages, 15);
        assert_eq!(config.scraping.delay_range(), (2.0, 5.0));
        assert_eq!(config.headers.accept_language, "en-IN, en;q=0.9");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: ScrapeConfig = toml::from_str(
            r#"
            [scraping]
            max_pages = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.scraping.max_pages, 3);
        assert_eq!(config.scraping.min_delay_secs, 2.0);
        assert_eq!(config.site.query, "phone under 30k");
        assert_eq!(config.selectors.title, "h2");
    }

    #[test]
    fn test_delay_bounds_validation() {
        let mut scraping = ScrapingConfig::default();
        scraping.min_delay_secs = 6.0;
        assert!(scraping.validate().is_err());

        scraping.min_delay_secs = -1.0;
        assert!(scraping.validate().is_err());

        scraping.min_delay_secs = 0.0;
        scraping.max_delay_secs = 0.0;
        assert!(scraping.validate().is_ok());
    }

    #[test]
    fn test_unrepresentable_delays_rejected() {
        let config: ScrapeConfig = toml::from_str(
            r#"
            [scraping]
            min_delay_secs = 1e20
            max_delay_secs = 1e20
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config: ScrapeConfig = toml::from_str(
            r#"
            [scraping]
            min_delay_secs = 1.0
            max_delay_secs = inf
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let mut scraping = ScrapingConfig::default();
        scraping.max_delay_secs = f64::NAN;
        assert!(scraping.validate().is_err());
    }
}
