// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Assemble the structured search request.
//!
//! A compiled query is a boolean query: full-text `must` clauses (empty means
//! match everything), ANDed `filter` clauses, an optional explicit sort, and a
//! from/size window. It is immutable once built and can be rendered to the
//! Elasticsearch query DSL or evaluated directly by the in-process backend.
//!
//! # Filter composition
//!
//! The explicit category from the request and the category inferred from the
//! text are added independently. If they disagree the intersection is empty,
//! and that is a legitimate zero-result answer, not an error.

use serde_json::{json, Map, Value};

use super::price::PriceIntent;
use crate::schema::{CATEGORY_FIELD, DESCRIPTION_FIELD, NAME_FIELD, PRICE_FIELD};
use crate::types::{CategoryId, SearchRequest, SortMode};

/// Boost applied to product-name matches.
pub const NAME_BOOST: f64 = 4.0;

/// Boost applied to description matches.
pub const DESCRIPTION_BOOST: f64 = 2.0;

/// Share of query terms a field must contain to match.
pub const MINIMUM_SHOULD_MATCH_PERCENT: u32 = 75;

/// A field and its relevance multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBoost {
    pub field: &'static str,
    pub boost: f64,
}

/// Edit-distance tolerance for full-text terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Exact terms only.
    Off,
    /// Distance chosen from term length: 0 for 1-2 chars, 1 for 3-5, 2 beyond.
    Auto,
}

/// Ranked full-text clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FullTextClause {
    MultiMatch {
        query: String,
        fields: Vec<FieldBoost>,
        fuzziness: Fuzziness,
        minimum_should_match_percent: u32,
    },
}

/// Non-scoring constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    Term {
        field: &'static str,
        value: i64,
    },
    Range {
        field: &'static str,
        gte: Option<f64>,
        lte: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// Structured, backend-neutral search request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Empty means match all documents.
    pub must: Vec<FullTextClause>,
    pub filters: Vec<FilterClause>,
    /// Empty means relevance order.
    pub sort: Vec<SortClause>,
    pub from: usize,
    pub size: usize,
}

impl CompiledQuery {
    pub fn is_match_all(&self) -> bool {
        self.must.is_empty()
    }

    /// Render as an Elasticsearch `_search` body.
    pub fn to_dsl(&self) -> Value {
        let must: Vec<Value> = if self.must.is_empty() {
            vec![json!({ "match_all": {} })]
        } else {
            self.must.iter().map(full_text_dsl).collect()
        };
        let filter: Vec<Value> = self.filters.iter().map(filter_dsl).collect();

        let mut body = json!({
            "from": self.from,
            "size": self.size,
            "query": {
                "bool": {
                    "must": must,
                    "filter": filter,
                }
            }
        });

        if !self.sort.is_empty() {
            let sort: Vec<Value> = self
                .sort
                .iter()
                .map(|s| json!({ s.field: s.direction.as_str() }))
                .collect();
            body["sort"] = Value::Array(sort);
        }

        body
    }
}

fn full_text_dsl(clause: &FullTextClause) -> Value {
    match clause {
        FullTextClause::MultiMatch {
            query,
            fields,
            fuzziness,
            minimum_should_match_percent,
        } => {
            let fields: Vec<String> = fields
                .iter()
                .map(|f| format!("{}^{}", f.field, f.boost))
                .collect();
            let mut multi_match = json!({
                "query": query,
                "fields": fields,
                "minimum_should_match": format!("{}%", minimum_should_match_percent),
            });
            if *fuzziness == Fuzziness::Auto {
                multi_match["fuzziness"] = json!("AUTO");
            }
            json!({ "multi_match": multi_match })
        }
    }
}

fn filter_dsl(clause: &FilterClause) -> Value {
    match clause {
        FilterClause::Term { field, value } => json!({ "term": { *field: value } }),
        FilterClause::Range { field, gte, lte } => {
            let mut bounds = Map::new();
            if let Some(gte) = gte {
                bounds.insert("gte".to_string(), json!(gte));
            }
            if let Some(lte) = lte {
                bounds.insert("lte".to_string(), json!(lte));
            }
            json!({ "range": { *field: bounds } })
        }
    }
}

/// Build the compiled query from the request and the extracted intents.
pub fn compile(
    request: &SearchRequest,
    price: PriceIntent,
    inferred_category: Option<CategoryId>,
    residual: &str,
) -> CompiledQuery {
    let mut must = Vec::new();
    if !residual.is_empty() {
        must.push(FullTextClause::MultiMatch {
            query: residual.to_string(),
            fields: vec![
                FieldBoost {
                    field: NAME_FIELD,
                    boost: NAME_BOOST,
                },
                FieldBoost {
                    field: DESCRIPTION_FIELD,
                    boost: DESCRIPTION_BOOST,
                },
            ],
            fuzziness: Fuzziness::Auto,
            minimum_should_match_percent: MINIMUM_SHOULD_MATCH_PERCENT,
        });
    }

    let mut filters = Vec::new();
    if let Some(category_id) = request.category_id {
        filters.push(FilterClause::Term {
            field: CATEGORY_FIELD,
            value: category_id,
        });
    }
    if let Some(category_id) = inferred_category {
        filters.push(FilterClause::Term {
            field: CATEGORY_FIELD,
            value: category_id,
        });
    }
    match price {
        PriceIntent::Unbounded => {}
        PriceIntent::AtMost(n) => filters.push(FilterClause::Range {
            field: PRICE_FIELD,
            gte: None,
            lte: Some(n),
        }),
        PriceIntent::AtLeast(n) => filters.push(FilterClause::Range {
            field: PRICE_FIELD,
            gte: Some(n),
            lte: None,
        }),
    }

    let sort = match request.sort {
        SortMode::PriceLow => vec![SortClause {
            field: PRICE_FIELD,
            direction: SortDirection::Asc,
        }],
        SortMode::PriceHigh => vec![SortClause {
            field: PRICE_FIELD,
            direction: SortDirection::Desc,
        }],
        SortMode::Relevance => Vec::new(),
    };

    CompiledQuery {
        must,
        filters,
        sort,
        from: request.offset(),
        size: request.limit,
    }
}
