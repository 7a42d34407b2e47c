// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search backend: where compiled queries run and where index documents live.
//!
//! ```text
//!                 ┌──────────────────────────┐
//! CompiledQuery ─▶│      SearchBackend       │─▶ SearchHits ─▶ ResultPage
//!                 │  ElasticBackend (HTTP)   │
//! IndexDocument ─▶│  MemoryBackend (in-proc) │─▶ BulkReport
//!                 └──────────────────────────┘
//! ```
//!
//! Both implementations honor the same contract: `total` counts every match
//! regardless of the page window, bulk writes are upserts keyed by product id,
//! and a create on an existing index fails with `IndexAlreadyExists`.

#[cfg(feature = "elasticsearch")]
mod elastic;
mod memory;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::query::CompiledQuery;
use crate::schema::IndexSchema;
use crate::types::{IndexDocument, ProductId, ResultItem, ResultPage};

#[cfg(feature = "elasticsearch")]
pub use elastic::ElasticBackend;
pub use memory::MemoryBackend;

/// When bulk writes become visible to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refresh {
    /// Visible before the bulk call returns.
    #[default]
    Immediate,
    /// Visible after the backend's next refresh.
    Deferred,
}

/// One matching document.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: ProductId,
    /// Absent when an explicit sort replaced relevance.
    pub score: Option<f64>,
    pub document: IndexDocument,
}

/// Raw search response: the page of hits and the total match count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<Hit>,
}

impl SearchHits {
    /// Flatten into the public response shape, keeping hit order.
    pub fn into_page(self) -> ResultPage {
        let items = self
            .hits
            .into_iter()
            .map(|hit| {
                let mut document = hit.document;
                document.id = hit.id;
                ResultItem::from(document)
            })
            .collect();
        ResultPage {
            items,
            total: self.total,
        }
    }
}

/// Outcome of a bulk write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkReport {
    pub indexed: usize,
    pub failed: usize,
}

/// A full-text search engine holding one or more named indexes.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a compiled query against `index`.
    async fn search(&self, index: &str, query: &CompiledQuery) -> Result<SearchHits, BackendError>;

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError>;

    /// Create `index` with the schema's analyzers and mappings.
    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), BackendError>;

    async fn delete_index(&self, index: &str) -> Result<(), BackendError>;

    /// Upsert documents keyed by their product id.
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[IndexDocument],
        refresh: Refresh,
    ) -> Result<BulkReport, BackendError>;
}
