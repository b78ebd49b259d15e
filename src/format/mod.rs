//! CSV output for scraped products.

use crate::shop::models::{Product, PRODUCT_FIELDS};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Writes `products` to `path`, replacing any existing file.
///
/// The header row is always written, so an empty listing still produces a
/// valid (header-only) file.
pub fn write_products(products: &[Product], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} products to {}", products.len(), path.display());

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(PRODUCT_FIELDS)?;
    for product in products {
        writer
            .serialize(product)
            .with_context(|| format!("Failed to write '{}' to {}", product.title, path.display()))?;
    }

    writer.flush().with_context(|| format!("Failed to flush {}", path.display()))
}

/// Reads products back from a file written by [`write_products`], by header name.
pub fn read_products(path: impl AsRef<Path>) -> Result<Vec<Product>> {
    let path = path.as_ref();

    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open {}", path.display()))?;

    reader
        .deserialize()
        .enumerate()
        .map(|(index, row)| {
            row.with_context(|| format!("Bad record #{} in {}", index + 1, path.display()))
        })
        .collect()
}
