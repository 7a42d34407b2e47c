// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `ProductSearch`: the catalog, the search backend and the vocabulary cache,
//! wired together.
//!
//! Request path (stateless, safe to call concurrently):
//!
//! ```text
//! SearchRequest ─▶ vocabulary (cached) ─▶ plan_query ─▶ backend.search ─▶ ResultPage
//! ```
//!
//! Startup path (`warm_up`, at most once per instance):
//!
//! ```text
//! ensure_index ──ok──▶ sync_all
//!      │                  │
//!      └─err─▶ log        └─err─▶ log
//! ```
//!
//! Warm-up never fails. The process keeps serving; searches fail until the
//! backend recovers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::backend::SearchBackend;
use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::query::{plan_query, QueryPlan};
use crate::schema::{self, EnsureOutcome, IndexSchema, DEFAULT_INDEX};
use crate::sync::{self, SyncReport, DEFAULT_SYNC_LIMIT};
use crate::types::{ResultPage, SearchRequest};
use crate::utils::AndStripping;
use crate::vocabulary::{Vocabulary, VocabularyCache};

/// Default vocabulary refresh interval.
pub const DEFAULT_VOCABULARY_TTL: Duration = Duration::from_secs(60);

/// Knobs for [`ProductSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub index_name: String,
    pub and_stripping: AndStripping,
    /// Zero reloads the vocabulary on every request.
    pub vocabulary_ttl: Duration,
    pub sync_batch_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX.to_string(),
            and_stripping: AndStripping::default(),
            vocabulary_ttl: DEFAULT_VOCABULARY_TTL,
            sync_batch_limit: DEFAULT_SYNC_LIMIT,
        }
    }
}

/// What warm-up managed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WarmUpReport {
    /// `None` if the index check or creation failed.
    pub ensured: Option<EnsureOutcome>,
    /// `None` if sync failed or was skipped.
    pub synced: Option<SyncReport>,
    /// True when this call found warm-up already done and did nothing.
    pub skipped: bool,
}

/// Product search over a catalog store and a search backend.
pub struct ProductSearch {
    catalog: Arc<dyn CatalogStore>,
    backend: Arc<dyn SearchBackend>,
    vocabulary: VocabularyCache,
    schema: IndexSchema,
    settings: SearchSettings,
    warmed: AtomicBool,
}

impl ProductSearch {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        backend: Arc<dyn SearchBackend>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            catalog,
            backend,
            vocabulary: VocabularyCache::new(settings.vocabulary_ttl, settings.and_stripping),
            schema: IndexSchema::products(),
            settings,
            warmed: AtomicBool::new(false),
        }
    }

    /// Replace the index schema used by `ensure_index` and `recreate_index`.
    pub fn with_schema(mut self, schema: IndexSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn backend(&self) -> &Arc<dyn SearchBackend> {
        &self.backend
    }

    /// The vocabulary cache; call `invalidate()` after catalog category edits.
    pub fn vocabulary(&self) -> &VocabularyCache {
        &self.vocabulary
    }

    /// Compile a request without running it.
    pub async fn plan(&self, request: &SearchRequest) -> Result<QueryPlan> {
        let vocabulary: Arc<Vocabulary> = self.vocabulary.get(self.catalog.as_ref()).await?;
        Ok(plan_query(request, &vocabulary, self.settings.and_stripping))
    }

    /// Answer one search request.
    pub async fn search(&self, request: &SearchRequest) -> Result<ResultPage> {
        let plan = self.plan(request).await?;
        tracing::debug!(
            raw = %request.raw_text,
            normalized = %plan.normalized,
            price = ?plan.price,
            category = ?plan.category,
            residual = %plan.residual,
            from = plan.compiled.from,
            size = plan.compiled.size,
            "compiled search query"
        );

        let hits = self
            .backend
            .search(&self.settings.index_name, &plan.compiled)
            .await?;
        Ok(hits.into_page())
    }

    /// Create the index if missing.
    pub async fn ensure_index(&self) -> Result<EnsureOutcome> {
        let outcome =
            schema::ensure_index(self.backend.as_ref(), &self.settings.index_name, &self.schema).await?;
        Ok(outcome)
    }

    /// Drop and recreate the index. Every indexed document is lost.
    pub async fn recreate_index(&self) -> Result<()> {
        schema::recreate_index(self.backend.as_ref(), &self.settings.index_name, &self.schema).await?;
        Ok(())
    }

    /// Copy the catalog into the index.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        sync::sync_all(
            self.catalog.as_ref(),
            self.backend.as_ref(),
            &self.settings.index_name,
            self.settings.sync_batch_limit,
        )
        .await
    }

    /// Ensure the index, then sync. Runs at most once; errors are logged, never returned.
    pub async fn warm_up(&self) -> WarmUpReport {
        if self.warmed.swap(true, Ordering::SeqCst) {
            tracing::info!("warm-up already ran, skipping");
            return WarmUpReport {
                skipped: true,
                ..WarmUpReport::default()
            };
        }

        let ensured = match self.ensure_index().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, index = %self.settings.index_name, "index setup failed, search will be unavailable");
                return WarmUpReport::default();
            }
        };

        let synced = match self.sync_all().await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!(error = %e, index = %self.settings.index_name, "catalog sync failed");
                None
            }
        };

        WarmUpReport {
            ensured: Some(ensured),
            synced,
            skipped: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::catalog::MemoryCatalog;
    use crate::error::SearchError;
    use crate::types::{Category, Product};

    fn setup() -> (Arc<MemoryCatalog>, Arc<MemoryBackend>, ProductSearch) {
        let catalog = Arc::new(MemoryCatalog::with_data(
            vec![Category::new(1, "Mobiles").synonym("phone")],
            vec![Product {
                id: 1,
                name: "Pixel".to_string(),
                description: "Google phone".to_string(),
                price: 15000.0,
                category_id: 1,
                inserted_at: None,
            }],
        ));
        let backend = Arc::new(MemoryBackend::new());
        let search = ProductSearch::new(catalog.clone(), backend.clone(), SearchSettings::default());
        (catalog, backend, search)
    }

    #[tokio::test]
    async fn test_warm_up_runs_once() {
        let (_, backend, search) = setup();
        let first = search.warm_up().await;
        assert_eq!(first.ensured, Some(EnsureOutcome::Created));
        assert_eq!(first.synced.map(|s| s.indexed), Some(1));
        assert!(!first.skipped);

        let second = search.warm_up().await;
        assert!(second.skipped);
        assert_eq!(backend.document_count("products"), Some(1));
    }

    #[tokio::test]
    async fn test_warm_up_swallows_backend_failure() {
        let (_, backend, search) = setup();
        backend.set_unreachable(true);
        let report = search.warm_up().await;
        assert_eq!(report.ensured, None);
        assert_eq!(report.synced, None);
    }

    #[tokio::test]
    async fn test_search_after_warm_up() {
        let (_, _, search) = setup();
        search.warm_up().await;
        let page = search.search(&SearchRequest::new("phone under 20000")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, 1);
    }

    #[tokio::test]
    async fn test_search_surfaces_catalog_failure() {
        let (catalog, _, search) = setup();
        search.warm_up().await;
        catalog.set_unavailable(true);
        let err = search.search(&SearchRequest::new("phone")).await.unwrap_err();
        assert!(matches!(err, SearchError::Catalog(_)));
    }
}
