use anyhow::Result;
use mobile_eda::config::{load_eda_config, load_scrape_config};
use mobile_eda::pipeline::{run_eda, run_scrape};
use std::env;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Analyze an existing raw table instead of scraping first
    let skip_scrape = env::args().any(|arg| arg == "--skip-scrape" || arg == "-s");

    if skip_scrape {
        info!("🚀 Starting mobile EDA pipeline (using existing raw table)");
    } else {
        info!("🚀 Starting mobile EDA pipeline (scraping first)");
    }

    let eda_config = load_eda_config()?;

    if !skip_scrape {
        let mut scrape_config = load_scrape_config()?;
        // The analysis stage reads whatever the collector wrote.
        scrape_config.output.raw_csv = eda_config.paths.input_csv.clone();

        match run_scrape(&scrape_config).await {
            Ok(table) if table.is_empty() => warn!("⚠️ Scrape finished with no listings"),
            Ok(table) => info!("✅ Scraped {} listings", table.len()),
            Err(e) => {
                error!("❌ Scrape failed: {:#}", e);
                return Err(e);
            }
        }
    }

    match run_eda(&eda_config) {
        Ok(charts) => {
            info!("🎉 Pipeline completed: {} charts, report at {}", charts.len(), eda_config.paths.report_pdf);
            Ok(())
        }
        Err(e) => {
            error!("❌ Analysis failed: {:#}", e);
            Err(e)
        }
    }
}
