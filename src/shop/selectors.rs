//! CSS selectors for the test shop's listing pages.
//!
//! Update this file when the shop's markup changes, then refresh
//! `tests/fixtures/listing.html` to match.

use scraper::Selector;
use std::sync::LazyLock;

/// Raw CSS of the "load more" control, shared with the WebDriver locator.
pub const LOAD_MORE_CSS: &str = ".ecomerce-items-scroll-more";

/// One product card.
pub static PRODUCT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".product-wrapper").unwrap());

/// Title link; the full title lives in its `title` attribute.
pub static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".title").unwrap());

/// Attribute holding the untruncated product title.
pub static TITLE_ATTR: &str = "title";

pub static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".description").unwrap());

pub static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".price").unwrap());

/// Filled star icons inside the ratings paragraph.
pub static STAR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p .ws-icon.ws-icon-star").unwrap());

/// "N reviews" label.
pub static REVIEW_COUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".review-count").unwrap());

pub static LOAD_MORE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(LOAD_MORE_CSS).unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selectors_compile() {
        // Forces every LazyLock so a bad selector fails here, not mid-run.
        let _ = &*PRODUCT;
        let _ = &*TITLE;
        let _ = &*DESCRIPTION;
        let _ = &*PRICE;
        let _ = &*STAR;
        let _ = &*REVIEW_COUNT;
        let _ = &*LOAD_MORE;
    }

    #[test]
    fn test_star_selector_requires_both_classes() {
        let html = scraper::Html::parse_fragment(
            r#"<p><span class="ws-icon ws-icon-star"></span><span class="ws-icon"></span>
               <span class="ws-icon-star"></span></p>"#,
        );
        assert_eq!(html.select(&STAR).count(), 1);
    }
}
