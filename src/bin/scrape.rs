use anyhow::Result;
use mobile_eda::config::load_scrape_config;
use mobile_eda::pipeline::run_scrape;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let config = load_scrape_config()?;

    match run_scrape(&config).await {
        Ok(table) => {
            info!("Saved {} records to {}", table.len(), config.output.raw_csv);
            Ok(())
        }
        Err(e) => {
            error!("❌ Scrape failed: {:#}", e);
            Err(e)
        }
    }
}
