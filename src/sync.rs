// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Full catalog → index synchronization.
//!
//! Reads up to `limit` products and upserts them in one bulk call with an
//! immediate refresh. Products deleted from the catalog are not removed from
//! the index, and rows beyond `limit` are not read.

use crate::backend::{Refresh, SearchBackend};
use crate::catalog::CatalogStore;
use crate::error::Result;
use crate::types::IndexDocument;

/// Maximum number of products read per sync.
pub const DEFAULT_SYNC_LIMIT: usize = 10_000;

/// Counts from one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Products read from the catalog.
    pub read: usize,
    pub indexed: usize,
    pub failed: usize,
}

/// Copy the catalog into the index.
///
/// An empty catalog is a no-op, logged as a warning. A catalog failure aborts
/// before the backend is touched.
pub async fn sync_all(
    catalog: &dyn CatalogStore,
    backend: &dyn SearchBackend,
    index: &str,
    limit: usize,
) -> Result<SyncReport> {
    let products = catalog.list_products(limit).await?;
    if products.is_empty() {
        tracing::warn!(index, "no products found in catalog, nothing to index");
        return Ok(SyncReport::default());
    }

    let documents: Vec<IndexDocument> = products.iter().map(IndexDocument::from).collect();
    let report = backend.bulk_index(index, &documents, Refresh::Immediate).await?;

    if report.failed > 0 {
        tracing::warn!(index, failed = report.failed, "some products failed to index");
    }
    tracing::info!(index, indexed = report.indexed, "products synced to search index");

    Ok(SyncReport {
        read: products.len(),
        indexed: report.indexed,
        failed: report.failed,
    })
}
