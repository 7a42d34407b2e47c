// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-memory catalog for tests, demos and benchmarks.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::CatalogStore;
use crate::error::CatalogError;
use crate::types::{Category, CategorySynonymRow, Product};

/// A catalog held in memory. Categories are returned in insertion order,
/// products in ascending id order.
#[derive(Default)]
pub struct MemoryCatalog {
    categories: RwLock<Vec<Category>>,
    products: RwLock<Vec<Product>>,
    unavailable: AtomicBool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(categories: Vec<Category>, products: Vec<Product>) -> Self {
        let catalog = Self::new();
        for category in categories {
            catalog.add_category(category);
        }
        for product in products {
            catalog.add_product(product);
        }
        catalog
    }

    pub fn add_category(&self, category: Category) {
        self.categories.write().push(category);
    }

    /// Insert or replace a product by id.
    pub fn add_product(&self, product: Product) {
        let mut products = self.products.write();
        match products.binary_search_by_key(&product.id, |p| p.id) {
            Ok(i) => products[i] = product,
            Err(i) => products.insert(i, product),
        }
    }

    /// Simulate an outage: every read fails until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("memory catalog offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn list_categories_with_synonyms(&self) -> Result<Vec<CategorySynonymRow>, CatalogError> {
        self.check_available()?;
        Ok(self.categories.read().iter().flat_map(Category::to_rows).collect())
    }

    async fn list_products(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        self.check_available()?;
        Ok(self.products.read().iter().take(limit).cloned().collect())
    }
}
