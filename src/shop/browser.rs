//! WebDriver-backed browser sessions for pages that render products client-side.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use url::Url;

/// A live browser tab that can be driven to expand a page.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates to `url`.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Returns true if `css` matches an element that is displayed and enabled.
    async fn is_interactable(&mut self, css: &str) -> Result<bool>;

    /// Clicks the first element matching `css`.
    async fn click(&mut self, css: &str) -> Result<()>;

    /// Returns the current rendered document.
    async fn page_source(&mut self) -> Result<String>;

    /// Ends the session.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens browser sessions on demand.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// How long to wait between connection attempts to a freshly started driver.
const CONNECT_RETRY: Duration = Duration::from_millis(100);

/// Connection attempts made after starting a driver process.
const CONNECT_ATTEMPTS: u32 = 20;

/// A WebDriver server process owned by a browser session.
pub struct DriverProcess {
    program: String,
    child: Child,
}

impl DriverProcess {
    /// Starts `program` with `args`, discarding its output.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self> {
        info!("Starting {} {}", program, args.join(" "));
        let child = Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start {}", program))?;
        debug!("{} running with pid {:?}", program, child.id());

        Ok(Self { program: program.to_string(), child })
    }

    /// Kills the process if it is still running and waits for it to exit.
    pub async fn shutdown(mut self) -> Result<ExitStatus> {
        if let Some(status) = self.child.try_wait()? {
            debug!("{} already exited with {}", self.program, status);
            return Ok(status);
        }

        self.child.start_kill().with_context(|| format!("Failed to stop {}", self.program))?;
        let status = self
            .child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", self.program))?;
        debug!("{} stopped ({})", self.program, status);
        Ok(status)
    }
}

/// Port a driver must listen on to serve `webdriver_url`.
fn driver_port(webdriver_url: &str) -> Result<u16> {
    let url = Url::parse(webdriver_url)
        .with_context(|| format!("Invalid WebDriver URL: {}", webdriver_url))?;
    url.port_or_known_default()
        .with_context(|| format!("WebDriver URL has no port: {}", webdriver_url))
}

/// Opens Chrome sessions through a WebDriver server.
///
/// With a driver program set, the launcher starts it on the port of
/// `webdriver_url` and the session stops it again on close. Without one it
/// connects to a server that is already running.
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
    driver: Option<String>,
}

impl WebDriverLauncher {
    pub fn new(webdriver_url: impl Into<String>, headless: bool) -> Self {
        Self { webdriver_url: webdriver_url.into(), headless, driver: None }
    }

    /// Starts `program` (e.g. `chromedriver`) for every session.
    pub fn with_driver(mut self, program: impl Into<String>) -> Self {
        self.driver = Some(program.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let launcher = Self::new(config.webdriver_url.clone(), config.headless);
        if config.spawn_driver {
            launcher.with_driver(config.driver_path.clone())
        } else {
            launcher
        }
    }

    /// Chrome capabilities requested for the session.
    fn capabilities(&self) -> Map<String, Value> {
        let mut args = vec!["--window-size=1920,1080"];
        if self.headless {
            args.push("--headless=new");
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    async fn connect(&self, attempts: u32) -> Result<Client> {
        let mut attempt = 1;
        loop {
            let mut builder = ClientBuilder::native();
            builder.capabilities(self.capabilities());
            match builder.connect(&self.webdriver_url).await {
                Ok(client) => return Ok(client),
                Err(e) if attempt < attempts => {
                    debug!("WebDriver not ready (attempt {}/{}): {}", attempt, attempts, e);
                    attempt += 1;
                    tokio::time::sleep(CONNECT_RETRY).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to connect to WebDriver at {}", self.webdriver_url)
                    })
                }
            }
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let driver = match &self.driver {
            Some(program) => {
                let port = driver_port(&self.webdriver_url)?;
                Some(DriverProcess::spawn(program, &[format!("--port={}", port)])?)
            }
            None => None,
        };

        info!("Connecting to WebDriver at {}", self.webdriver_url);
        let attempts = if driver.is_some() { CONNECT_ATTEMPTS } else { 1 };
        let client = match self.connect(attempts).await {
            Ok(client) => client,
            Err(e) => {
                if let Some(driver) = driver {
                    if let Err(stop_err) = driver.shutdown().await {
                        warn!("{:#}", stop_err);
                    }
                }
                return Err(e);
            }
        };

        Ok(Box::new(WebDriverSession { client, driver }))
    }
}

/// Browser session over a fantoccini client, plus the driver it started.
pub struct WebDriverSession {
    client: Client,
    driver: Option<DriverProcess>,
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url).await.with_context(|| format!("Failed to navigate to {}", url))
    }

    async fn is_interactable(&mut self, css: &str) -> Result<bool> {
        let elements = self
            .client
            .find_all(Locator::Css(css))
            .await
            .with_context(|| format!("Failed to look up '{}'", css))?;

        let Some(element) = elements.first() else {
            return Ok(false);
        };

        Ok(element.is_displayed().await? && element.is_enabled().await?)
    }

    async fn click(&mut self, css: &str) -> Result<()> {
        let element = self
            .client
            .find(Locator::Css(css))
            .await
            .with_context(|| format!("Failed to find '{}'", css))?;
        element.click().await.with_context(|| format!("Failed to click '{}'", css))
    }

    async fn page_source(&mut self) -> Result<String> {
        self.client.source().await.context("Failed to read page source")
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let WebDriverSession { client, driver } = *self;
        let closed = client.close().await.context("Failed to close WebDriver session");

        let stopped = match driver {
            Some(driver) => driver.shutdown().await.map(|_| ()),
            None => Ok(()),
        };
        closed.and(stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_headless() {
        let launcher = WebDriverLauncher::new("http://localhost:9515", true);
        let caps = launcher.capabilities();

        assert_eq!(caps["browserName"], "chrome");
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn test_capabilities_headed() {
        let launcher = WebDriverLauncher::new("http://localhost:9515", false);
        let caps = launcher.capabilities();

        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            webdriver_url: "http://grid:4444".to_string(),
            headless: true,
            spawn_driver: false,
            ..Config::default()
        };
        let launcher = WebDriverLauncher::from_config(&config);
        assert_eq!(launcher.webdriver_url, "http://grid:4444");
        assert!(launcher.headless);
        assert!(launcher.driver.is_none());
    }

    #[test]
    fn test_from_config_spawns_driver_by_default() {
        let launcher = WebDriverLauncher::from_config(&Config::default());
        assert_eq!(launcher.driver.as_deref(), Some("chromedriver"));
        assert!(!launcher.headless);
    }

    #[test]
    fn test_driver_port() {
        assert_eq!(driver_port("http://localhost:9515").unwrap(), 9515);
        assert_eq!(driver_port("http://grid:4444/wd/hub").unwrap(), 4444);
        assert_eq!(driver_port("http://localhost").unwrap(), 80);
        assert!(driver_port("not a url").is_err());
    }

    #[tokio::test]
    async fn test_launch_without_server_fails() {
        let launcher = WebDriverLauncher::new("http://127.0.0.1:9", true);
        let err = launcher.launch().await.err().expect("no WebDriver listens on port 9");
        assert!(err.to_string().contains("Failed to connect to WebDriver"));
    }

    #[tokio::test]
    async fn test_launch_with_missing_driver_fails() {
        let launcher = WebDriverLauncher::new("http://127.0.0.1:9", true)
            .with_driver("/nonexistent/chromedriver");
        let err = launcher.launch().await.err().expect("driver binary does not exist");
        assert!(err.to_string().contains("Failed to start /nonexistent/chromedriver"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_driver_process_is_killed_and_reaped() {
        let driver = DriverProcess::spawn("sleep", &["30".to_string()]).unwrap();
        assert!(driver.child.id().is_some());

        let status = driver.shutdown().await.unwrap();
        assert!(!status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_driver_process_already_exited() {
        let mut driver = DriverProcess::spawn("true", &[]).unwrap();
        driver.child.wait().await.unwrap();

        let status = driver.shutdown().await.unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_stops_driver_when_connect_fails() {
        // `sleep` exits on the unknown --port flag, so nothing ever listens.
        let launcher = WebDriverLauncher::new("http://127.0.0.1:9", true).with_driver("sleep");
        let err = launcher.launch().await.err().expect("nothing serves WebDriver on port 9");
        assert!(err.to_string().contains("Failed to connect to WebDriver at http://127.0.0.1:9"));
    }
}
