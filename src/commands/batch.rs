//! Batch command: scrape every configured category into its own CSV file.

use crate::config::Config;
use crate::format;
use crate::shop::{
    BrowserLauncher, Category, ListingScraper, PageFetcher, PageSource, ShopClient,
    WebDriverLauncher,
};
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// One written output file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub category: Category,
    pub path: PathBuf,
    pub products: usize,
}

/// Files written by a run, in the order they were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn total_products(&self) -> usize {
        self.entries.iter().map(|e| e.products).sum()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "{:<10} {:>5} products  {}",
                entry.category.to_string(),
                entry.products,
                entry.path.display()
            )?;
        }
        write!(f, "Total: {} products in {} files", self.total_products(), self.entries.len())
    }
}

/// Runs the whole batch.
pub struct BatchCommand {
    config: Config,
}

impl BatchCommand {
    /// Creates a new batch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the HTTP client and WebDriver launcher, then runs every category.
    pub async fn execute(&self) -> Result<BatchSummary> {
        let client = ShopClient::new(&self.config).context("Failed to create HTTP client")?;
        let launcher = WebDriverLauncher::from_config(&self.config);
        let mut scraper = ListingScraper::new(PageFetcher::new(client, launcher, &self.config));

        self.execute_with(&mut scraper).await
    }

    /// Runs every category with a provided scraper (for testing).
    ///
    /// The scraper's browser session is closed afterwards, whether or not the
    /// run failed. Files written before a failure stay on disk.
    pub async fn execute_with<S: PageSource, L: BrowserLauncher>(
        &self,
        scraper: &mut ListingScraper<S, L>,
    ) -> Result<BatchSummary> {
        let outcome = self.run_all(scraper).await;
        let closed = scraper.shutdown().await;

        match (outcome, closed) {
            (Ok(summary), Ok(())) => Ok(summary),
            (Ok(_), Err(e)) => Err(e.context("Failed to release browser session")),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!("Failed to release browser session: {:#}", close_err);
                Err(e)
            }
        }
    }

    async fn run_all<S: PageSource, L: BrowserLauncher>(
        &self,
        scraper: &mut ListingScraper<S, L>,
    ) -> Result<BatchSummary> {
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.config.output_dir.display())
        })?;

        let total = self.config.categories.len();
        let mut summary = BatchSummary::default();

        for (index, &category) in self.config.categories.iter().enumerate() {
            let url = category.url(&self.config.base_url);
            info!("[{}/{}] Scraping {}: {}", index + 1, total, category, url);

            let products = scraper
                .scrape(&url)
                .await
                .with_context(|| format!("Failed to scrape category '{}'", category))?;

            let path = self.config.output_path(category);
            format::write_products(&products, &path)?;
            info!("[{}/{}] Wrote {} products to {}", index + 1, total, products.len(), path.display());

            summary.entries.push(BatchEntry { category, path, products: products.len() });
        }

        Ok(summary)
    }
}
