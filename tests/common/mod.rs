//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use catalog_search::{
    MemoryBackend, MemoryCatalog, ProductId, ProductSearch, ResultPage, SearchRequest, SearchSettings,
};

// Re-export canonical fixtures from catalog_search::testing
pub use catalog_search::testing::*;

pub struct Fixture {
    pub catalog: Arc<MemoryCatalog>,
    pub backend: Arc<MemoryBackend>,
    pub search: ProductSearch,
}

/// Sample catalog, in-process backend, warmed up (index created and synced).
pub async fn warmed() -> Fixture {
    warmed_with(SearchSettings::default()).await
}

pub async fn warmed_with(settings: SearchSettings) -> Fixture {
    let fixture = cold_with(settings);
    fixture.search.warm_up().await;
    fixture
}

/// Fixture whose index has not been touched yet.
pub fn cold() -> Fixture {
    cold_with(SearchSettings::default())
}

pub fn cold_with(settings: SearchSettings) -> Fixture {
    let (catalog, backend, search) = sample_search(settings);
    Fixture {
        catalog,
        backend,
        search,
    }
}

pub async fn run(search: &ProductSearch, request: SearchRequest) -> ResultPage {
    search.search(&request).await.expect("search should succeed")
}

pub fn ids(page: &ResultPage) -> Vec<ProductId> {
    page.items.iter().map(|item| item.id).collect()
}

pub fn prices(page: &ResultPage) -> Vec<f64> {
    page.items.iter().map(|item| item.price).collect()
}
