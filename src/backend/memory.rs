// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-process search backend.
//!
//! Evaluates compiled queries directly over analyzed documents. Used by tests
//! and by `--backend memory` runs that have no search cluster at hand.
//!
//! # Algorithm
//!
//! ```text
//! for each visible document:
//!     every filter must pass            (term: equality, range: inclusive)
//!     every full-text clause must match (best field wins, see `scoring`)
//!     score = Σ clause scores, or 1.0 when there are no clauses
//! order: explicit sort, else score descending; ties by product id ascending
//! total = number of matches; page = matches[from .. from + size]
//! ```
//!
//! Bulk writes with [`Refresh::Deferred`] land in a pending buffer and are not
//! searchable until [`MemoryBackend::refresh`] runs.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use parking_lot::RwLock;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{BulkReport, Hit, Refresh, SearchBackend, SearchHits};
use crate::analysis::Analyzer;
use crate::error::BackendError;
use crate::query::{CompiledQuery, FilterClause, FullTextClause, SortDirection};
use crate::schema::{IndexSchema, CATEGORY_FIELD, DESCRIPTION_FIELD, NAME_FIELD, PRICE_FIELD};
use crate::scoring::field_score;
use crate::types::{IndexDocument, ProductId};

/// Score given to every document by a query with no full-text clauses.
const MATCH_ALL_SCORE: f64 = 1.0;

#[derive(Debug, Clone)]
struct StoredDoc {
    doc: IndexDocument,
    name_terms: Vec<String>,
    description_terms: Vec<String>,
}

impl StoredDoc {
    fn new(doc: IndexDocument, analyzer: &Analyzer) -> Self {
        Self {
            name_terms: analyzer.analyze(&doc.name),
            description_terms: analyzer.analyze(&doc.description),
            doc,
        }
    }

    fn terms(&self, field: &str) -> &[String] {
        match field {
            NAME_FIELD => &self.name_terms,
            DESCRIPTION_FIELD => &self.description_terms,
            _ => &[],
        }
    }

    fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            PRICE_FIELD => Some(self.doc.price),
            CATEGORY_FIELD => Some(self.doc.category_id as f64),
            _ => None,
        }
    }

    fn passes(&self, filter: &FilterClause) -> bool {
        match filter {
            FilterClause::Term { field, value } => match *field {
                CATEGORY_FIELD => self.doc.category_id == *value,
                _ => false,
            },
            FilterClause::Range { field, gte, lte } => match self.numeric(field) {
                Some(v) => gte.map_or(true, |lo| v >= lo) && lte.map_or(true, |hi| v <= hi),
                None => false,
            },
        }
    }
}

#[derive(Debug)]
struct MemoryIndex {
    analyzer: Analyzer,
    docs: BTreeMap<ProductId, StoredDoc>,
    pending: BTreeMap<ProductId, StoredDoc>,
}

impl MemoryIndex {
    fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            docs: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Score one document, or `None` if it does not match.
    fn score(&self, stored: &StoredDoc, query: &CompiledQuery, analyzed: &[Vec<String>]) -> Option<f64> {
        if !query.filters.iter().all(|f| stored.passes(f)) {
            return None;
        }
        if query.must.is_empty() {
            return Some(MATCH_ALL_SCORE);
        }

        let mut total = 0.0;
        for (clause, query_terms) in query.must.iter().zip(analyzed) {
            let FullTextClause::MultiMatch {
                fields,
                fuzziness,
                minimum_should_match_percent,
                ..
            } = clause;

            let best = fields
                .iter()
                .filter_map(|f| {
                    field_score(
                        query_terms,
                        stored.terms(f.field),
                        f.boost,
                        *fuzziness,
                        *minimum_should_match_percent,
                    )
                })
                .max_by(f64::total_cmp)?;
            total += best;
        }
        Some(total)
    }

    fn search(&self, query: &CompiledQuery) -> SearchHits {
        // Query text goes through the same analyzer as the documents.
        let analyzed: Vec<Vec<String>> = query
            .must
            .iter()
            .map(|clause| match clause {
                FullTextClause::MultiMatch { query, .. } => self.analyzer.analyze(query),
            })
            .collect();

        #[cfg(feature = "parallel")]
        let mut matches: Vec<(f64, &StoredDoc)> = self
            .docs
            .par_iter()
            .filter_map(|(_, stored)| self.score(stored, query, &analyzed).map(|s| (s, stored)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let mut matches: Vec<(f64, &StoredDoc)> = self
            .docs
            .values()
            .filter_map(|stored| self.score(stored, query, &analyzed).map(|s| (s, stored)))
            .collect();

        let scored = query.sort.is_empty();
        if scored {
            matches.sort_by(|(sa, a), (sb, b)| sb.total_cmp(sa).then(a.doc.id.cmp(&b.doc.id)));
        } else {
            matches.sort_by(|(_, a), (_, b)| {
                query
                    .sort
                    .iter()
                    .map(|clause| {
                        let va = a.numeric(clause.field).unwrap_or(0.0);
                        let vb = b.numeric(clause.field).unwrap_or(0.0);
                        match clause.direction {
                            SortDirection::Asc => va.total_cmp(&vb),
                            SortDirection::Desc => vb.total_cmp(&va),
                        }
                    })
                    .find(|o| *o != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
                    .then(a.doc.id.cmp(&b.doc.id))
            });
        }

        let total = matches.len() as u64;
        let hits = matches
            .into_iter()
            .skip(query.from)
            .take(query.size)
            .map(|(score, stored)| Hit {
                id: stored.doc.id,
                score: scored.then_some(score),
                document: stored.doc.clone(),
            })
            .collect();

        SearchHits { total, hits }
    }
}

/// A search backend that lives entirely in this process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    indexes: RwLock<HashMap<String, MemoryIndex>>,
    unreachable: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `Unreachable` until reset.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, AtomicOrdering::SeqCst);
    }

    /// Make pending bulk writes searchable.
    pub fn refresh(&self, index: &str) -> Result<(), BackendError> {
        self.check_reachable()?;
        let mut indexes = self.indexes.write();
        let idx = indexes
            .get_mut(index)
            .ok_or_else(|| BackendError::IndexNotFound(index.to_string()))?;
        let pending = std::mem::take(&mut idx.pending);
        idx.docs.extend(pending);
        Ok(())
    }

    /// Number of searchable documents in `index`.
    pub fn document_count(&self, index: &str) -> Option<usize> {
        self.indexes.read().get(index).map(|idx| idx.docs.len())
    }

    /// Stored copy of one document.
    pub fn document(&self, index: &str, id: ProductId) -> Option<IndexDocument> {
        self.indexes
            .read()
            .get(index)
            .and_then(|idx| idx.docs.get(&id))
            .map(|stored| stored.doc.clone())
    }

    fn check_reachable(&self) -> Result<(), BackendError> {
        if self.unreachable.load(AtomicOrdering::SeqCst) {
            return Err(BackendError::Unreachable("memory backend offline".to_string()));
        }
        Ok(())
    }

    fn search_sync(&self, index: &str, query: &CompiledQuery) -> Result<SearchHits, BackendError> {
        let indexes = self.indexes.read();
        let idx = indexes
            .get(index)
            .ok_or_else(|| BackendError::IndexNotFound(index.to_string()))?;
        Ok(idx.search(query))
    }

    fn bulk_sync(&self, index: &str, documents: &[IndexDocument], refresh: Refresh) -> BulkReport {
        let mut indexes = self.indexes.write();
        // Writing to a missing index creates it with default analysis, as a
        // cluster with dynamic mapping would.
        let idx = indexes
            .entry(index.to_string())
            .or_insert_with(|| MemoryIndex::new(Analyzer::standard()));

        for doc in documents {
            let stored = StoredDoc::new(doc.clone(), &idx.analyzer);
            match refresh {
                Refresh::Immediate => {
                    idx.pending.remove(&doc.id);
                    idx.docs.insert(doc.id, stored);
                }
                Refresh::Deferred => {
                    idx.pending.insert(doc.id, stored);
                }
            }
        }

        BulkReport {
            indexed: documents.len(),
            failed: 0,
        }
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    async fn search(&self, index: &str, query: &CompiledQuery) -> Result<SearchHits, BackendError> {
        self.check_reachable()?;
        self.search_sync(index, query)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        self.check_reachable()?;
        Ok(self.indexes.read().contains_key(index))
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), BackendError> {
        self.check_reachable()?;
        let mut indexes = self.indexes.write();
        if indexes.contains_key(index) {
            return Err(BackendError::IndexAlreadyExists(index.to_string()));
        }
        indexes.insert(index.to_string(), MemoryIndex::new(Analyzer::from_schema(schema)));
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), BackendError> {
        self.check_reachable()?;
        match self.indexes.write().remove(index) {
            Some(_) => Ok(()),
            None => Err(BackendError::IndexNotFound(index.to_string())),
        }
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[IndexDocument],
        refresh: Refresh,
    ) -> Result<BulkReport, BackendError> {
        self.check_reachable()?;
        Ok(self.bulk_sync(index, documents, refresh))
    }
}
