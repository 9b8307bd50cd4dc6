use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the clean / chart / report stages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    pub paths: PathConfig,
    pub charts: ChartConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub input_csv: String,
    pub cleaned_csv: String,
    pub figures_dir: String,
    pub report_pdf: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub price_bins: usize,
    pub rating_bins: usize,
    pub top_categories: usize,
    pub top_brands_by_price: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    pub subtitle: String,
}

impl EdaConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read EDA config file: {}", path.display()))?;
        let config: EdaConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse EDA config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let charts = &self.charts;
        if charts.price_bins == 0 || charts.rating_bins == 0 {
            return Err(anyhow!("Histogram bucket counts must be positive"));
        }
        if charts.top_categories == 0 || charts.top_brands_by_price == 0 {
            return Err(anyhow!("Top-N chart limits must be positive"));
        }
        Ok(())
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            input_csv: "amazon_mobiles_under_30k.csv".to_string(),
            cleaned_csv: "cleaned_amazon_mobiles_under_30k.csv".to_string(),
            figures_dir: "figs".to_string(),
            report_pdf: "EDA_report_amazon_mobiles_under_30k.pdf".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            price_bins: 15,
            rating_bins: 10,
            top_categories: 6,
            top_brands_by_price: 10,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "EDA Report".to_string(),
            subtitle: "Amazon - Mobiles Under 30,000".to_string(),
        }
    }
}
