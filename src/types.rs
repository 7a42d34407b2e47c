// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The nouns of the system: catalog rows, index documents, requests and result pages.
//!
//! Catalog rows are owned by the relational store. `IndexDocument` is the derived,
//! possibly stale copy that lives in the search index, serialized with the index's
//! field names (`proname`, `description`, `price`, `catid`, `dateinserted`).
//! Those names are part of the index contract and must not drift.
//!
//! `SearchRequest` and `ResultPage` are created and discarded per call.

use serde::{Deserialize, Serialize};

/// Catalog primary key for categories.
pub type CategoryId = i64;

/// Catalog primary key for products. Doubles as the index document id.
pub type ProductId = i64;

/// Page used when the caller supplies none.
pub const DEFAULT_PAGE: usize = 1;

/// Page size used when the caller supplies none.
pub const DEFAULT_LIMIT: usize = 8;

// =============================================================================
// CATALOG ROWS
// =============================================================================

/// A category with its synonym terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            synonyms: Vec::new(),
        }
    }

    /// Add a synonym term.
    pub fn synonym(mut self, term: impl Into<String>) -> Self {
        self.synonyms.push(term.into());
        self
    }

    /// Flatten into the join shape the catalog store returns: one row per
    /// synonym, or a single row with no synonym.
    pub fn to_rows(&self) -> Vec<CategorySynonymRow> {
        if self.synonyms.is_empty() {
            return vec![CategorySynonymRow {
                category_id: self.id,
                category_name: self.name.clone(),
                synonym: None,
            }];
        }
        self.synonyms
            .iter()
            .map(|s| CategorySynonymRow {
                category_id: self.id,
                category_name: self.name.clone(),
                synonym: Some(s.clone()),
            })
            .collect()
    }
}

/// One row of the categories ⟕ category_synonyms join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySynonymRow {
    pub category_id: CategoryId,
    pub category_name: String,
    pub synonym: Option<String>,
}

/// A catalog product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Non-negative; already coerced from the store's decimal column.
    pub price: f64,
    pub category_id: CategoryId,
    /// ISO-8601 insertion timestamp, when the store records one.
    #[serde(default)]
    pub inserted_at: Option<String>,
}

// =============================================================================
// INDEX DOCUMENT
// =============================================================================

/// The search index's copy of a product.
///
/// `id` is carried as the backend document id, not inside the stored source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(skip)]
    pub id: ProductId,
    #[serde(rename = "proname")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(rename = "catid")]
    pub category_id: CategoryId,
    #[serde(
        rename = "dateinserted",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub inserted_at: Option<String>,
}

impl From<&Product> for IndexDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category_id: product.category_id,
            inserted_at: product.inserted_at.clone(),
        }
    }
}

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// How the result page is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Backend's native score ordering.
    #[default]
    Relevance,
    /// Ascending by price.
    PriceLow,
    /// Descending by price.
    PriceHigh,
}

impl SortMode {
    /// Parse the `sort` request parameter. Anything unrecognised means relevance.
    pub fn parse(value: &str) -> Self {
        match value {
            "price_low" => SortMode::PriceLow,
            "price_high" => SortMode::PriceHigh,
            _ => SortMode::Relevance,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::PriceLow => "price_low",
            SortMode::PriceHigh => "price_high",
        }
    }
}

/// An already-typed search request.
///
/// `page` and `limit` are expected to be at least 1; defaulting invalid input is
/// the caller's job (see `server::SearchParams`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub raw_text: String,
    pub page: usize,
    pub limit: usize,
    /// Category chosen explicitly by the caller (e.g. browsing a category page).
    pub category_id: Option<CategoryId>,
    pub sort: SortMode,
}

impl SearchRequest {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            category_id: None,
            sort: SortMode::Relevance,
        }
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Number of hits to skip: `(page - 1) * limit`, saturating at `usize::MAX`.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One product on a result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(rename = "prodid")]
    pub id: ProductId,
    #[serde(rename = "proname")]
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "catid")]
    pub category_id: CategoryId,
}

impl From<IndexDocument> for ResultItem {
    fn from(doc: IndexDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            price: doc.price,
            category_id: doc.category_id,
        }
    }
}

/// A page of results plus the backend-reported total for the whole query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(rename = "products")]
    pub items: Vec<ResultItem>,
    pub total: u64,
}
