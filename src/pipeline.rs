use anyhow::{Context, Result};
use tracing::info;

use crate::charts::{ChartPaths, render_charts};
use crate::config::{EdaConfig, ScrapeConfig};
use crate::fetcher::{Collector, HttpPageSource};
use crate::models::Table;
use crate::processor::clean;
use crate::report::build_report;
use crate::storage;

/// Scrape the configured search and write the raw table once at the end.
pub async fn run_scrape(config: &ScrapeConfig) -> Result<Table> {
    config.validate()?;

    let source = HttpPageSource::new(config.headers.clone())?;
    let collector = Collector::from_config(source, config)?;

    info!("Scraping '{}' on {}", config.site.query, config.site.name);
    let table = collector
        .collect(&config.site.query, config.scraping.max_pages, config.scraping.delay_range())
        .await?;

    storage::save_records(&table, &config.output.raw_csv)
        .with_context(|| format!("Failed to save scraped table to {}", config.output.raw_csv))?;
    Ok(table)
}

/// Clean the raw table, render the charts and assemble the PDF report.
pub fn run_eda(config: &EdaConfig) -> Result<ChartPaths> {
    config.validate()?;
    let paths = &config.paths;

    let raw = storage::load_records(&paths.input_csv)
        .with_context(|| format!("Failed to load raw table {}", paths.input_csv))?;
    info!("Loaded {} raw listings from {}", raw.len(), paths.input_csv);

    let cleaned = clean(&raw);
    storage::save_cleaned(&cleaned, &paths.cleaned_csv)?;
    info!("✔ Cleaned CSV saved as: {}", paths.cleaned_csv);

    // Re-read from disk so charts and statistics see exactly what was persisted.
    let df = storage::load_cleaned(&paths.cleaned_csv)?;

    let charts = render_charts(&df, &paths.figures_dir, &config.charts)?;
    info!("✔ {} figures saved in '{}'", charts.len(), paths.figures_dir);

    build_report(&df, &charts, &paths.report_pdf, &config.report)?;
    info!("✔ PDF report created: {}", paths.report_pdf);

    Ok(charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::render::{
        AVG_PRICE_BRAND, BRAND_PIE, PRICE_HIST, PRICE_VS_RATING, RAM_PIE, RATING_HIST,
    };
    use crate::models::{BRAND, PRICE, RAM, RATING, Record};
    use std::path::Path;

    fn record(title: &str, raw_price: &str, raw_rating: &str) -> Record {
        Record {
            title: title.to_string(),
            raw_price: raw_price.to_string(),
            raw_rating: raw_rating.to_string(),
            specs: "Dual SIM".to_string(),
        }
    }

    fn config_in(dir: &Path, figures_dir: &Path) -> EdaConfig {
        let mut config = EdaConfig::default();
        config.paths.input_csv = dir.join("raw.csv").to_string_lossy().into_owned();
        config.paths.cleaned_csv = dir.join("cleaned.csv").to_string_lossy().into_owned();
        config.paths.figures_dir = figures_dir.to_string_lossy().into_owned();
        config.paths.report_pdf = dir.join("report.pdf").to_string_lossy().into_owned();
        config
    }

    fn chart_names(charts: &ChartPaths) -> Vec<String> {
        charts
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    const CHART_ORDER: [&str; 6] = [PRICE_HIST, RATING_HIST, BRAND_PIE, RAM_PIE, AVG_PRICE_BRAND, PRICE_VS_RATING];

    #[test]
    fn test_run_eda_writes_charts_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), &dir.path().join("out").join("figs"));
        let raw = vec![
            record("Samsung Galaxy M14 (6GB RAM, 128GB)", "10,000", "4.0 out of 5 stars"),
            record("Redmi 13C", "", "4.5 out of 5 stars"),
            record("Samsung Galaxy A15 (8GB RAM, 128GB)", "20,000", ""),
        ];
        storage::save_records(&raw, &config.paths.input_csv).unwrap();

        let charts = run_eda(&config).unwrap();

        assert_eq!(chart_names(&charts), CHART_ORDER.to_vec());
        for chart in &charts {
            assert!(chart.starts_with(&config.paths.figures_dir));
            assert!(std::fs::metadata(chart).unwrap().len() > 0, "{} is empty", chart.display());
        }

        let report = std::fs::read(&config.paths.report_pdf).unwrap();
        assert!(report.starts_with(b"%PDF"));

        let cleaned = storage::load_cleaned(&config.paths.cleaned_csv).unwrap();
        let prices: Vec<Option<f64>> = cleaned.column(PRICE).unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(prices, vec![Some(10000.0), None, Some(20000.0)]);
        assert_eq!(cleaned.column(RATING).unwrap().null_count(), 1);
        assert_eq!(cleaned.column(BRAND).unwrap().null_count(), 0);
        assert_eq!(cleaned.column(RAM).unwrap().null_count(), 1);
    }

    #[test]
    fn test_run_eda_on_empty_table_still_renders_every_chart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), &dir.path().join("figs"));
        storage::save_records(&[], &config.paths.input_csv).unwrap();

        let charts = run_eda(&config).unwrap();

        assert_eq!(chart_names(&charts), CHART_ORDER.to_vec());
        assert!(charts.iter().all(|chart| chart.exists()));
        assert!(Path::new(&config.paths.report_pdf).exists());
    }

    #[test]
    fn test_run_eda_fails_when_figures_dir_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();

        let config = config_in(dir.path(), &blocker.join("figs"));
        storage::save_records(&[record("Redmi 13C", "8,999", "4.2 out of 5 stars")], &config.paths.input_csv)
            .unwrap();

        assert!(run_eda(&config).is_err());
        assert!(!Path::new(&config.paths.report_pdf).exists());
    }

    #[test]
    fn test_run_eda_fails_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), &dir.path().join("figs"));

        assert!(run_eda(&config).is_err());
    }
}
