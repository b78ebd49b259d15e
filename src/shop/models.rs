//! Product record extracted from a listing card.

use serde::{Deserialize, Serialize};

/// Column order of the CSV output, matching the field order of [`Product`].
pub const PRODUCT_FIELDS: [&str; 5] = ["title", "description", "price", "rating", "num_of_reviews"];

/// A product card as shown on a listing page.
///
/// Only ever built fully populated by the parser; there is no partial form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Full product title
    pub title: String,
    /// Description with non-breaking spaces normalized
    pub description: String,
    /// Price without currency symbol
    pub price: f64,
    /// Number of filled stars
    pub rating: u32,
    /// Number of reviews
    pub num_of_reviews: u32,
}

impl Product {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        rating: u32,
        num_of_reviews: u32,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            rating,
            num_of_reviews,
        }
    }
}
