mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod services;

use crate::config::AppConfig;
use crate::external::alphavantage::AlphaVantageProvider;
use crate::logging::LoggingConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    logging::init_logging(&LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;
    let provider = AlphaVantageProvider::new(&config.api_key);

    let summary = app::run(&config, &provider).await?;

    if !summary.fetch_failures.is_empty() || !summary.persist_failures.is_empty() {
        tracing::warn!(
            "run finished with {} fetch failure(s) and {} persistence failure(s)",
            summary.fetch_failures.len(),
            summary.persist_failures.len()
        );
    }
    if summary.comparison_ran {
        tracing::info!("🚀 comparison report complete");
    }

    Ok(())
}
