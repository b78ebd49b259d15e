//! webscraper-shop - scrape every test-shop category into CSV files.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use webscraper_shop::commands::BatchCommand;
use webscraper_shop::config::Config;

#[derive(Parser)]
#[command(
    name = "webscraper-shop",
    version,
    about = "Scrape the webscraper.io test shop into one CSV file per category",
    long_about = "Fetches every category listing of the webscraper.io e-commerce test shop, \
                  expands \"load more\" pages through a WebDriver browser, and writes \
                  <category>.csv files. Runs with sensible defaults when given no arguments."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let config = Config::load(cli.config.as_deref())?.with_env();

    let summary = BatchCommand::new(config).execute().await?;
    info!("Batch complete");
    println!("{}", summary);

    Ok(())
}
