//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::shop::categories::{Category, DEFAULT_BASE_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site the category paths are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// WebDriver server used for "load more" pages
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Start the WebDriver server for the run instead of using a running one
    #[serde(default = "default_spawn_driver")]
    pub spawn_driver: bool,

    /// WebDriver server binary started when `spawn_driver` is set
    #[serde(default = "default_driver_path")]
    pub driver_path: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Wait after navigation before touching the page, in milliseconds.
    /// A visible browser can have its cookie banner dismissed during this wait;
    /// a headless one cannot, and the banner may cover the load more control.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Upper bound on "load more" clicks per page
    #[serde(default = "default_max_load_more_clicks")]
    pub max_load_more_clicks: usize,

    /// Static request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory the CSV files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Categories to scrape, in order
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_spawn_driver() -> bool {
    true
}

fn default_driver_path() -> String {
    "chromedriver".to_string()
}

fn default_headless() -> bool {
    false
}

fn default_settle_ms() -> u64 {
    5000
}

fn default_max_load_more_clicks() -> usize {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_categories() -> Vec<Category> {
    Category::all().to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            spawn_driver: default_spawn_driver(),
            driver_path: default_driver_path(),
            headless: default_headless(),
            settle_ms: default_settle_ms(),
            max_load_more_clicks: default_max_load_more_clicks(),
            request_timeout_secs: default_request_timeout_secs(),
            output_dir: default_output_dir(),
            categories: default_categories(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("webscraper-shop").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) = std::env::var("SHOP_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(webdriver_url) = std::env::var("SHOP_WEBDRIVER_URL") {
            self.webdriver_url = webdriver_url;
        }

        if let Ok(driver_path) = std::env::var("SHOP_DRIVER_PATH") {
            self.driver_path = driver_path;
        }

        if let Ok(settle) = std::env::var("SHOP_SETTLE_MS") {
            if let Ok(ms) = settle.parse() {
                self.settle_ms = ms;
            }
        }

        if let Ok(dir) = std::env::var("SHOP_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        self
    }

    /// Output path for a category's CSV file.
    pub fn output_path(&self, category: Category) -> PathBuf {
        self.output_dir.join(category.file_name())
    }
}
