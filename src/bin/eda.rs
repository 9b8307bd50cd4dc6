use anyhow::Result;
use mobile_eda::config::load_eda_config;
use mobile_eda::pipeline::run_eda;
use tracing::{error, info};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let config = load_eda_config()?;

    match run_eda(&config) {
        Ok(charts) => {
            info!("✔ Figures saved in '{}' ({} charts)", config.paths.figures_dir, charts.len());
            Ok(())
        }
        Err(e) => {
            error!("❌ EDA failed: {:#}", e);
            Err(e)
        }
    }
}
