//! Listing scraper: fetch a page and turn its cards into products.

use crate::shop::browser::BrowserLauncher;
use crate::shop::client::PageSource;
use crate::shop::fetcher::PageFetcher;
use crate::shop::models::Product;
use crate::shop::parser;
use anyhow::{Context, Result};
use tracing::debug;

pub struct ListingScraper<S, L> {
    fetcher: PageFetcher<S, L>,
}

impl<S: PageSource, L: BrowserLauncher> ListingScraper<S, L> {
    pub fn new(fetcher: PageFetcher<S, L>) -> Self {
        Self { fetcher }
    }

    /// Returns every product on the listing at `url`, in page order.
    pub async fn scrape(&mut self, url: &str) -> Result<Vec<Product>> {
        let html = self.fetcher.fetch(url).await?;
        let products =
            parser::parse_listing(&html).with_context(|| format!("Failed to parse {}", url))?;
        debug!("{} products on {}", products.len(), url);
        Ok(products)
    }

    /// Releases the browser session, if any.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.fetcher.shutdown().await
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &PageFetcher<S, L> {
        &self.fetcher
    }
}
