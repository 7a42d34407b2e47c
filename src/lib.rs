// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Product catalog search: a query compiler and an index lifecycle pipeline.
//!
//! Free text like `"samsung phone under 20000"` is compiled into a structured
//! search: a price range, an inferred category and a fuzzy multi-field match
//! on whatever words are left. The index that query runs against is created
//! with a synonym-aware analyzer and filled from the relational catalog.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────── query ─────────────────────┐
//! SearchRequest ──▶│ utils::normalize → price → category → compile  │──▶ CompiledQuery
//!                  └─────────────────────────▲──────────────────────┘        │
//!                                            │                               ▼
//!                               vocabulary (cached)                    SearchBackend
//!                                            ▲                       (elastic | memory)
//!                                            │                               ▲
//! ┌──────────────┐   categories, synonyms    │                               │
//! │ CatalogStore │───────────────────────────┘                               │
//! │(mysql|memory)│─── products ──▶ sync::sync_all ──▶ bulk ──────────────────┤
//! └──────────────┘                                                           │
//!                    schema::ensure_index (analyzer + mappings) ─────────────┘
//! ```
//!
//! [`ProductSearch`] owns the wiring; [`server`] puts it behind HTTP.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog_search::{MemoryBackend, MemoryCatalog, ProductSearch, SearchRequest, SearchSettings};
//!
//! let search = ProductSearch::new(
//!     Arc::new(MemoryCatalog::new()),
//!     Arc::new(MemoryBackend::new()),
//!     SearchSettings::default(),
//! );
//! search.warm_up().await;
//! let page = search.search(&SearchRequest::new("phone under 20000")).await?;
//! ```

pub mod analysis;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod query;
pub mod schema;
pub mod scoring;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod sync;
pub mod types;
pub mod utils;
pub mod vocabulary;

#[doc(hidden)]
pub mod testing;

// Re-exports for public API
pub use backend::{BulkReport, Hit, MemoryBackend, Refresh, SearchBackend, SearchHits};
#[cfg(feature = "elasticsearch")]
pub use backend::ElasticBackend;
pub use catalog::{CatalogStore, MemoryCatalog};
#[cfg(feature = "mysql")]
pub use catalog::{MySqlCatalog, PoolSettings};
pub use config::{BackendKind, Config};
pub use error::{BackendError, CatalogError, Result, SearchError};
pub use query::{plan_query, CompiledQuery, PriceIntent, QueryPlan};
pub use schema::{ensure_index, recreate_index, EnsureOutcome, IndexSchema};
pub use service::{ProductSearch, SearchSettings, WarmUpReport};
pub use sync::{sync_all, SyncReport};
pub use types::{
    Category, CategoryId, IndexDocument, Product, ProductId, ResultItem, ResultPage, SearchRequest,
    SortMode,
};
pub use utils::{normalize, AndStripping};
pub use vocabulary::{Vocabulary, VocabularyCache};
