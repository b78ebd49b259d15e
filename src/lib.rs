//! webscraper-shop - one-shot scraper for the webscraper.io e-commerce test shop
//!
//! Fetches each category listing (expanding "load more" pages through a
//! WebDriver browser when needed) and writes the products to one CSV file
//! per category.

pub mod commands;
pub mod config;
pub mod format;
pub mod shop;

pub use config::Config;
pub use shop::{Category, Product};
