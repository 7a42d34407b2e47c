// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit tests, integration tests and benches.
//!
//! This module is always compiled but hidden from documentation.
//! The sample catalog is small enough to reason about by hand: every price is
//! distinct, and category ids are deliberately not in insertion order.

#![doc(hidden)]

use std::sync::Arc;

use crate::backend::MemoryBackend;
use crate::catalog::MemoryCatalog;
use crate::service::{ProductSearch, SearchSettings};
use crate::types::{Category, CategoryId, Product, ProductId};

pub const MOBILES: CategoryId = 1;
pub const LAPTOPS: CategoryId = 2;
pub const TELEVISIONS: CategoryId = 3;
pub const BOOKS: CategoryId = 4;
pub const KITCHEN: CategoryId = 5;
pub const FOOTWEAR: CategoryId = 6;
pub const ACCESSORIES: CategoryId = 7;

/// Create a product with an empty description.
pub fn make_product(id: ProductId, name: &str, price: f64, category_id: CategoryId) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: String::new(),
        price,
        category_id,
        inserted_at: None,
    }
}

fn described(id: ProductId, name: &str, description: &str, price: f64, category_id: CategoryId) -> Product {
    Product {
        description: description.to_string(),
        inserted_at: Some("2024-01-15T10:00:00Z".to_string()),
        ..make_product(id, name, price, category_id)
    }
}

/// Categories with synonyms, listed out of id order.
pub fn sample_categories() -> Vec<Category> {
    vec![
        Category::new(LAPTOPS, "Laptops").synonym("laptop").synonym("notebook"),
        Category::new(MOBILES, "Mobiles")
            .synonym("phone")
            .synonym("phones")
            .synonym("smartphone"),
        Category::new(TELEVISIONS, "Televisions").synonym("tv").synonym("television"),
        Category::new(BOOKS, "Books").synonym("book").synonym("novel"),
        Category::new(KITCHEN, "Home & Kitchen").synonym("cookware").synonym("utensils"),
        Category::new(FOOTWEAR, "Footwear").synonym("shoes").synonym("sandals"),
        Category::new(ACCESSORIES, "Accessories").synonym("charger").synonym("cable"),
    ]
}

/// Twelve products across the sample categories.
pub fn sample_products() -> Vec<Product> {
    vec![
        described(1, "Samsung Galaxy M34", "5G Android smartphone with 6000mAh battery", 16999.0, MOBILES),
        described(2, "Redmi Note 13", "Budget phone with AMOLED display", 14999.0, MOBILES),
        described(3, "iPhone 15", "Apple smartphone with A16 chip", 69999.0, MOBILES),
        described(4, "Dell Inspiron 15", "Thin laptop for office work", 45999.0, LAPTOPS),
        described(5, "ASUS ROG Strix G16", "Gaming laptop with RTX 4060 graphics", 124999.0, LAPTOPS),
        described(6, "Lenovo IdeaPad Gaming 3", "Entry gaming notebook with GTX graphics", 58999.0, LAPTOPS),
        described(7, "Sony Bravia 55", "4K Ultra HD smart television", 64999.0, TELEVISIONS),
        described(8, "Mi Smart TV 43", "Full HD Android TV", 22999.0, TELEVISIONS),
        described(9, "Atomic Habits", "Bestselling self-help book by James Clear", 399.0, BOOKS),
        described(10, "Prestige Pressure Cooker", "Stainless steel cookware for the kitchen", 1899.0, KITCHEN),
        described(11, "Wireless Gaming Mouse", "RGB mouse with 16000 DPI sensor", 2499.0, ACCESSORIES),
        described(12, "Bata Leather Sandals", "Comfortable sandals for daily wear", 1299.0, FOOTWEAR),
    ]
}

pub fn sample_catalog() -> MemoryCatalog {
    MemoryCatalog::with_data(sample_categories(), sample_products())
}

/// A search service over the sample catalog and an empty in-process backend.
/// Call `warm_up` to create and fill the index.
pub fn sample_search(settings: SearchSettings) -> (Arc<MemoryCatalog>, Arc<MemoryBackend>, ProductSearch) {
    let catalog = Arc::new(sample_catalog());
    let backend = Arc::new(MemoryBackend::new());
    let search = ProductSearch::new(catalog.clone(), backend.clone(), settings);
    (catalog, backend, search)
}
