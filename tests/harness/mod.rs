//! Shared test harness for list engine and storage testing
//!
//! Provides `TestProduct`, a data entity with fields covering every
//! `FieldValue` kind (including nullable ones), deterministic fixtures, and
//! tracing initialization for tests that want to see stage logs
//! (`RUST_LOG=listing=debug cargo test`).
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

pub mod data_service_tests;

use listing::prelude::*;
use std::sync::Once;

// ---------------------------------------------------------------------------
// TestProduct — covers all FieldValue kinds for thorough testing
// ---------------------------------------------------------------------------

impl_data_entity!(
    TestProduct,
    "test_product",
    ["name", "description"],
    {
        description: Option<String>,
        category: String,
        price: f64,
        stock: i64,
        active: bool,
        rating: Option<f64>,
    }
);

const NAMES: [&str; 5] = ["anvil", "Bolt", "chisel", "Drill", "easel"];
const CATEGORIES: [&str; 3] = ["tools", "garden", "kitchen"];

/// Create a product with the given values and sensible defaults for the rest.
pub fn product(name: &str, description: Option<&str>, price: f64, active: bool) -> TestProduct {
    TestProduct::new(
        name.to_string(),
        "active".to_string(),
        description.map(String::from),
        "tools".to_string(),
        price,
        10,
        active,
        Some(3.0),
    )
}

/// Generate `n` deterministic products with varied field values.
///
/// - `name`: "<word> <index>" with repeating words in mixed case
/// - `active`: false for every third product (index 0, 3, 6, ...)
/// - `rating`: null for every fourth product
/// - `description`: null for every fifth product
pub fn sample_products(n: usize) -> Vec<TestProduct> {
    (0..n)
        .map(|i| {
            TestProduct::new(
                format!("{} {:02}", NAMES[i % NAMES.len()], i),
                "active".to_string(),
                (i % 5 != 0).then(|| format!("Sample item number {}", i)),
                CATEGORIES[i % CATEGORIES.len()].to_string(),
                (i as f64) * 2.5 + 1.0,
                ((i * 7) % 11) as i64,
                i % 3 != 0,
                (i % 4 != 0).then(|| (i % 5) as f64),
            )
        })
        .collect()
}

/// Ten products for the search scenario: three mention both "lab" and
/// "science", two mention one of them, five mention neither.
pub fn lab_products() -> Vec<TestProduct> {
    vec![
        product("Science Lab kit", None, 40.0, true),
        product("Beaker set", Some("glassware"), 12.0, true),
        product("Lab coat", Some("cotton, white"), 25.0, true),
        product("Microscope", Some("for the science lab"), 180.0, true),
        product("Notebook", None, 3.0, true),
        product("Lab Science poster", Some("wall chart"), 8.0, true),
        product("Stapler", Some("office"), 6.0, true),
        product("Safety goggles", Some("science classes"), 15.0, true),
        product("Desk lamp", None, 22.0, true),
        product("Kettle", Some("kitchen"), 30.0, true),
    ]
}

/// Names of a page of items, for readable assertions.
pub fn names(items: &[TestProduct]) -> Vec<&str> {
    items.iter().map(|p| p.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

static TRACING: Once = Once::new();

/// Install a test-writer subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// Assertions helpers
// ---------------------------------------------------------------------------

/// Assert that a list contains exactly `n` entities.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

/// Assert that an `anyhow` error wraps a `ListError` with the given code.
pub fn assert_list_error(err: &anyhow::Error, expected_code: &str) {
    match err.downcast_ref::<ListError>() {
        Some(list_error) => assert_eq!(list_error.error_code(), expected_code),
        None => panic!("Expected ListError {}, got {:?}", expected_code, err),
    }
}
