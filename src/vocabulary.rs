// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Category vocabulary: the words that make a query token "mean" a category.
//!
//! Each category contributes its normalized name plus every normalized synonym,
//! split into single words. Entries are kept sorted by category id because the
//! matcher is first-match-wins and must not depend on load order.
//!
//! The vocabulary is read through a [`VocabularyCache`] handed to the search
//! service. A zero TTL reloads on every request.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::catalog::CatalogStore;
use crate::error::CatalogError;
use crate::types::{Category, CategoryId, CategorySynonymRow};
use crate::utils::{tokenize, AndStripping};

/// Normalized word set for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub category_id: CategoryId,
    pub name: String,
    /// Case-folded, punctuation-stripped, deduplicated single words.
    pub words: BTreeSet<String>,
}

impl VocabularyEntry {
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// All category entries in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

impl Vocabulary {
    /// Build from the category/synonym join rows.
    pub fn from_rows(rows: &[CategorySynonymRow], mode: AndStripping) -> Self {
        let mut by_id: BTreeMap<CategoryId, VocabularyEntry> = BTreeMap::new();

        for row in rows {
            let entry = by_id.entry(row.category_id).or_insert_with(|| VocabularyEntry {
                category_id: row.category_id,
                name: row.category_name.clone(),
                words: BTreeSet::new(),
            });
            entry.words.extend(tokenize(&row.category_name, mode));
            if let Some(synonym) = &row.synonym {
                entry.words.extend(tokenize(synonym, mode));
            }
        }

        Self {
            entries: by_id.into_values().collect(),
        }
    }

    pub fn from_categories(categories: &[Category], mode: AndStripping) -> Self {
        let rows: Vec<CategorySynonymRow> = categories.iter().flat_map(Category::to_rows).collect();
        Self::from_rows(&rows, mode)
    }

    /// Entries in ascending category id order.
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn get(&self, category_id: CategoryId) -> Option<&VocabularyEntry> {
        self.entries
            .binary_search_by_key(&category_id, |e| e.category_id)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read the full category/synonym table and build a vocabulary.
pub async fn load_vocabulary(
    catalog: &dyn CatalogStore,
    mode: AndStripping,
) -> Result<Vocabulary, CatalogError> {
    let rows = catalog.list_categories_with_synonyms().await?;
    Ok(Vocabulary::from_rows(&rows, mode))
}

struct Cached {
    vocabulary: Arc<Vocabulary>,
    loaded_at: Instant,
}

/// Read-through vocabulary cache with a refresh interval and a manual
/// invalidation hook.
///
/// Concurrent misses may each load; the last one to finish wins the slot.
/// The lock is never held across the catalog read.
pub struct VocabularyCache {
    ttl: Duration,
    mode: AndStripping,
    slot: RwLock<Option<Cached>>,
}

impl VocabularyCache {
    pub fn new(ttl: Duration, mode: AndStripping) -> Self {
        Self {
            ttl,
            mode,
            slot: RwLock::new(None),
        }
    }

    /// A cache that reloads on every call.
    pub fn uncached(mode: AndStripping) -> Self {
        Self::new(Duration::ZERO, mode)
    }

    pub fn mode(&self) -> AndStripping {
        self.mode
    }

    /// Return the cached vocabulary, reloading from the catalog when stale.
    pub async fn get(&self, catalog: &dyn CatalogStore) -> Result<Arc<Vocabulary>, CatalogError> {
        if let Some(fresh) = self.fresh() {
            return Ok(fresh);
        }

        let vocabulary = Arc::new(load_vocabulary(catalog, self.mode).await?);
        tracing::debug!(categories = vocabulary.len(), "vocabulary loaded");

        if !self.ttl.is_zero() {
            *self.slot.write() = Some(Cached {
                vocabulary: Arc::clone(&vocabulary),
                loaded_at: Instant::now(),
            });
        }
        Ok(vocabulary)
    }

    /// Drop the cached vocabulary; the next `get` reloads.
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    fn fresh(&self) -> Option<Arc<Vocabulary>> {
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|cached| cached.loaded_at.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.vocabulary))
    }
}
