mod config;
mod llm_client;
mod report;
mod seo;
mod wordpress;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::report::{RunReport, LOG_FILENAME, REPORT_FILENAME};
use crate::wordpress::WpClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting WordPress SEO optimization v{}",
        env!("CARGO_PKG_VERSION")
    );

    let wp = WpClient::new(&config.url, config.username, config.password);
    let llm = GeminiClient::new(config.gemini_api_key);
    info!("Generation client initialized (model: {})", llm_client::MODEL);

    let mut report = RunReport::new();
    seo::workflow::run(&wp, &llm, &mut report).await;

    report.write_csv(Path::new(REPORT_FILENAME))?;
    report.write_log(Path::new(LOG_FILENAME))?;

    // Partial failures are already in the log file; the run itself exits 0
    // on any completion.
    info!("SEO optimization completed!");
    info!("Total posts processed: {}", report.entries().len());
    info!(
        "Posts with added meta descriptions: {}",
        report.descriptions_added()
    );
    info!("Posts with added keywords: {}", report.keywords_added());
    info!("Posts with updated titles: {}", report.titles_updated());

    Ok(())
}
