//! Page fetching with on-demand "load more" expansion.

use crate::config::Config;
use crate::shop::browser::{BrowserLauncher, BrowserSession};
use crate::shop::client::PageSource;
use crate::shop::parser;
use crate::shop::selectors::LOAD_MORE_CSS;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Returns fully loaded listing HTML.
///
/// Pages are fetched statically first. Only when the static page carries a
/// "load more" control is a browser session used, launched on first need
/// and kept until [`PageFetcher::shutdown`].
pub struct PageFetcher<S, L> {
    source: S,
    launcher: L,
    session: Option<Box<dyn BrowserSession>>,
    settle: Duration,
    max_clicks: usize,
}

impl<S: PageSource, L: BrowserLauncher> PageFetcher<S, L> {
    pub fn new(source: S, launcher: L, config: &Config) -> Self {
        Self {
            source,
            launcher,
            session: None,
            settle: Duration::from_millis(config.settle_ms),
            max_clicks: config.max_load_more_clicks,
        }
    }

    /// Fetches `url`, expanding dynamic content if the page has any.
    pub async fn fetch(&mut self, url: &str) -> Result<String> {
        let html = self.source.get(url).await?;

        if !parser::has_load_more(&html) {
            debug!("No load more control on {}, using static page", url);
            return Ok(html);
        }

        info!("Load more control found on {}, switching to browser", url);
        self.expand(url).await
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Returns true once a browser session has been launched and not yet closed.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Closes the browser session if one was launched.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            info!("Closing browser session");
            session.close().await?;
        }
        Ok(())
    }

    async fn expand(&mut self, url: &str) -> Result<String> {
        let settle = self.settle;
        let max_clicks = self.max_clicks;
        let session = self.session().await?;

        session.goto(url).await?;
        if !settle.is_zero() {
            debug!("Waiting {:?} for the page to settle", settle);
            tokio::time::sleep(settle).await;
        }

        let mut clicks = 0;
        while session.is_interactable(LOAD_MORE_CSS).await? {
            if clicks >= max_clicks {
                anyhow::bail!("Load more still active after {} clicks on {}", clicks, url);
            }
            session.click(LOAD_MORE_CSS).await?;
            clicks += 1;
            debug!("Clicked load more ({})", clicks);
        }

        info!("Load full page: {} - complete after {} clicks", url, clicks);
        session.page_source().await.with_context(|| format!("Failed to read expanded page {}", url))
    }

    async fn session(&mut self) -> Result<&mut dyn BrowserSession> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                info!("Launching browser session");
                self.launcher.launch().await.context("Failed to launch browser session")?
            }
        };
        Ok(self.session.insert(session).as_mut())
    }
}
