// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search-query compiler.
//!
//! ```text
//! raw text ──▶ normalize ──▶ price intent ──▶ category match ──▶ compile
//!               (utils)       (price.rs)      (category.rs)     (compile.rs)
//!                                                   ▲
//!                                              Vocabulary
//! ```
//!
//! Each stage consumes the previous stage's residual text. Everything here is
//! pure: the vocabulary is passed in, nothing touches I/O.

pub mod category;
pub mod compile;
pub mod price;

pub use category::{match_category, CategoryMatch};
pub use compile::{
    compile, CompiledQuery, FieldBoost, FilterClause, FullTextClause, Fuzziness, SortClause,
    SortDirection,
};
pub use price::{extract_price_intent, PriceExtraction, PriceIntent};

use crate::types::{CategoryId, SearchRequest};
use crate::utils::{normalize, AndStripping};
use crate::vocabulary::Vocabulary;

/// Every intermediate of one compilation, for logging and `--explain`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub normalized: String,
    pub price: PriceIntent,
    pub category: Option<CategoryId>,
    /// Text left for full-text matching.
    pub residual: String,
    pub compiled: CompiledQuery,
}

/// Run the full compiler pipeline for one request.
pub fn plan_query(request: &SearchRequest, vocabulary: &Vocabulary, mode: AndStripping) -> QueryPlan {
    let normalized = normalize(&request.raw_text, mode);
    let price = extract_price_intent(&normalized);
    let category = match_category(&price.residual, vocabulary);
    let compiled = compile(request, price.intent, category.category_id, &category.residual);

    QueryPlan {
        normalized,
        price: price.intent,
        category: category.category_id,
        residual: category.residual,
        compiled,
    }
}
