//! Test-shop specific modules: fetching, browser expansion, parsing and models.

pub mod browser;
pub mod categories;
pub mod client;
pub mod fetcher;
pub mod listing;
pub mod models;
pub mod parser;
pub mod selectors;

pub use browser::{BrowserLauncher, BrowserSession, WebDriverLauncher};
pub use categories::Category;
pub use client::{PageSource, ShopClient};
pub use fetcher::PageFetcher;
pub use listing::ListingScraper;
pub use models::Product;
pub use parser::ExtractError;
