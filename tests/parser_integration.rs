//! Integration tests for listing parsing and CSV output using a fixture page.

use webscraper_shop::format::{read_products, write_products};
use webscraper_shop::shop::parser::{has_load_more, parse_listing};

const LISTING_FIXTURE: &str = include_str!("fixtures/listing.html");

#[test]
fn test_parse_listing_fixture() {
    let products = parse_listing(LISTING_FIXTURE).unwrap();
    assert_eq!(products.len(), 3);

    // Full title comes from the attribute, not the truncated link text
    let product = &products[0];
    assert_eq!(product.title, "Asus VivoBook X441NA-GA190");
    assert_eq!(product.price, 295.99);
    assert_eq!(product.rating, 3);
    assert_eq!(product.num_of_reviews, 14);
    assert!(product.description.contains("14\", Celeron N3450"));
    assert!(!product.description.contains('\u{a0}'));

    let product = &products[1];
    assert_eq!(product.title, "Asus ROG Strix SCAR Edition GL503VM-ED115T");
    assert_eq!(product.price, 1139.54);
    assert_eq!(product.rating, 1);
    assert_eq!(product.num_of_reviews, 8);

    let product = &products[2];
    assert_eq!(product.price, 1799.0);
    assert_eq!(product.rating, 0);
    assert_eq!(product.num_of_reviews, 0);
}

#[test]
fn test_fixture_has_load_more() {
    assert!(has_load_more(LISTING_FIXTURE));
}

#[test]
fn test_parse_empty_listing() {
    let html = r#"
        <html>
        <body>
            <h1 class="page-header">Nothing to see</h1>
        </body>
        </html>
    "#;

    let products = parse_listing(html).unwrap();
    assert!(products.is_empty());
    assert!(!has_load_more(html));
}

#[test]
fn test_fixture_csv_round_trip() {
    let products = parse_listing(LISTING_FIXTURE).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("laptops.csv");
    write_products(&products, &path).unwrap();

    assert_eq!(read_products(&path).unwrap(), products);
}
