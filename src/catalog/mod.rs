// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The relational catalog, as seen from search.
//!
//! Search only ever reads two things from the catalog: the category/synonym
//! join (for the vocabulary) and a bounded batch of product rows (for index
//! sync). Both sit behind [`CatalogStore`] so the pipeline can run against
//! MySQL in production and an in-memory store in tests.

mod memory;
#[cfg(feature = "mysql")]
mod mysql;

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::types::{CategorySynonymRow, Product};

pub use memory::MemoryCatalog;
#[cfg(feature = "mysql")]
pub use mysql::{MySqlCatalog, PoolSettings};

/// Read interface onto the catalog store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// One row per (category, synonym), or one row with no synonym for a
    /// category that has none. Order is unspecified.
    async fn list_categories_with_synonyms(&self) -> Result<Vec<CategorySynonymRow>, CatalogError>;

    /// Up to `limit` products with the fields needed for indexing.
    async fn list_products(&self, limit: usize) -> Result<Vec<Product>, CatalogError>;
}
