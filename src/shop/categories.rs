//! Listing categories of the test shop and the URLs they map to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default site the category paths are resolved against.
pub const DEFAULT_BASE_URL: &str = "https://webscraper.io/";

const HOME_PATH: &str = "test-sites/e-commerce/more/";

/// A listing page of the shop. Its name doubles as the CSV file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Laptops,
    Tablets,
    Touch,
    Home,
    Computers,
    Phones,
}

impl Category {
    /// Path of the listing page relative to the site root.
    pub fn path(&self) -> String {
        match self {
            Category::Home => HOME_PATH.to_string(),
            Category::Computers => format!("{HOME_PATH}computers/"),
            Category::Laptops => format!("{HOME_PATH}computers/laptops"),
            Category::Tablets => format!("{HOME_PATH}computers/tablets"),
            Category::Phones => format!("{HOME_PATH}phones/"),
            Category::Touch => format!("{HOME_PATH}phones/touch"),
        }
    }

    /// Full URL of the listing page under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        if base_url.ends_with('/') {
            format!("{}{}", base_url, self.path())
        } else {
            format!("{}/{}", base_url, self.path())
        }
    }

    /// Output file name, `<name>.csv`.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self)
    }

    /// All categories in the order a batch run visits them.
    pub fn all() -> &'static [Category] {
        &[
            Category::Laptops,
            Category::Tablets,
            Category::Touch,
            Category::Home,
            Category::Computers,
            Category::Phones,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Laptops => "laptops",
            Category::Tablets => "tablets",
            Category::Touch => "touch",
            Category::Home => "home",
            Category::Computers => "computers",
            Category::Phones => "phones",
        };
        write!(f, "{}", name)
    }
}
