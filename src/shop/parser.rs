//! HTML parsing for listing pages and product cards.

use crate::shop::models::Product;
use crate::shop::selectors;
use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, trace};

/// Why a product card could not be turned into a [`Product`].
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("missing element '{0}' in product card")]
    MissingElement(&'static str),

    #[error("missing attribute '{attribute}' on '{element}'")]
    MissingAttribute { element: &'static str, attribute: &'static str },

    #[error("invalid price '{0}'")]
    InvalidPrice(String),

    #[error("invalid review count '{0}'")]
    InvalidReviewCount(String),
}

/// Extracts one product from its card element.
pub fn extract_product(card: ElementRef) -> Result<Product, ExtractError> {
    let title = first(card, &selectors::TITLE, "title")?
        .value()
        .attr(selectors::TITLE_ATTR)
        .ok_or(ExtractError::MissingAttribute {
            element: "title",
            attribute: selectors::TITLE_ATTR,
        })?
        .to_string();

    let description = normalize_spaces(&text_of(first(
        card,
        &selectors::DESCRIPTION,
        "description",
    )?));

    let price = parse_price(&text_of(first(card, &selectors::PRICE, "price")?))?;

    let rating = card.select(&selectors::STAR).count() as u32;

    let num_of_reviews =
        parse_review_count(&text_of(first(card, &selectors::REVIEW_COUNT, "review-count")?))?;

    Ok(Product { title, description, price, rating, num_of_reviews })
}

/// Parses every product card of a listing page, in document order.
///
/// A page without product cards yields an empty list.
pub fn parse_listing(html: &str) -> Result<Vec<Product>> {
    let document = Html::parse_document(html);

    let mut products = Vec::new();
    for (index, card) in document.select(&selectors::PRODUCT).enumerate() {
        let product = extract_product(card)
            .with_context(|| format!("Failed to parse product #{}", index + 1))?;
        trace!("Parsed product: {} - {}", product.title, product.price);
        products.push(product);
    }

    debug!("Parsed {} products", products.len());
    Ok(products)
}

/// Returns true if the page carries a "load more" control.
pub fn has_load_more(html: &str) -> bool {
    Html::parse_document(html).select(&selectors::LOAD_MORE).next().is_some()
}

fn first<'a>(
    card: ElementRef<'a>,
    selector: &Selector,
    name: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    card.select(selector).next().ok_or(ExtractError::MissingElement(name))
}

fn text_of(element: ElementRef) -> String {
    element.text().collect()
}

/// Replaces non-breaking spaces with plain ones.
fn normalize_spaces(text: &str) -> String {
    text.replace('\u{a0}', " ")
}

/// Parses "$1139.54"-style text. Only the dollar sign is stripped.
fn parse_price(text: &str) -> Result<f64, ExtractError> {
    let cleaned = text.replace('$', "");
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ExtractError::InvalidPrice(text.trim().to_string())),
    }
}

/// Parses the leading number of a label such as "14 reviews".
fn parse_review_count(text: &str) -> Result<u32, ExtractError> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| ExtractError::InvalidReviewCount(text.trim().to_string()))
}
