// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the query compiler.
//!
//! Arbitrary user text, pagination and sort go through the whole pipeline.
//! The compiler must never panic and the compiled query must stay consistent
//! with the plan that produced it.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use catalog_search::testing::sample_categories;
use catalog_search::types::SortMode;
use catalog_search::{plan_query, AndStripping, PriceIntent, SearchRequest, Vocabulary};

#[derive(Debug, Arbitrary)]
struct QueryInput {
    text: String,
    page: u16,
    limit: u8,
    category: Option<i8>,
    sort: u8,
    word_mode: bool,
}

fuzz_target!(|input: QueryInput| {
    let mode = if input.word_mode {
        AndStripping::Word
    } else {
        AndStripping::Substring
    };
    static VOCABULARY: std::sync::OnceLock<[Vocabulary; 2]> = std::sync::OnceLock::new();
    let vocabularies = VOCABULARY.get_or_init(|| {
        [
            Vocabulary::from_categories(&sample_categories(), AndStripping::Substring),
            Vocabulary::from_categories(&sample_categories(), AndStripping::Word),
        ]
    });
    let vocabulary = &vocabularies[input.word_mode as usize];

    let sort = match input.sort % 3 {
        0 => SortMode::Relevance,
        1 => SortMode::PriceLow,
        _ => SortMode::PriceHigh,
    };
    let mut request = SearchRequest::new(input.text.chars().take(256).collect::<String>())
        .page(input.page.max(1) as usize)
        .limit(input.limit.max(1) as usize)
        .sort(sort);
    if let Some(category) = input.category {
        request = request.category(category as i64);
    }

    let plan = plan_query(&request, vocabulary, mode);

    // Normalized text: lowercase ASCII letters, digits and single spaces.
    assert!(plan
        .normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
    assert!(!plan.normalized.contains("  "));
    assert_eq!(plan.normalized.trim(), plan.normalized);

    assert!(plan.residual.len() <= plan.normalized.len());
    assert_eq!(plan.residual.is_empty(), plan.compiled.is_match_all());

    let expected_filters = request.category_id.is_some() as usize
        + plan.category.is_some() as usize
        + (plan.price != PriceIntent::Unbounded) as usize;
    assert_eq!(plan.compiled.filters.len(), expected_filters);

    assert_eq!(plan.compiled.from, request.offset());
    assert_eq!(plan.compiled.size, request.limit);

    // The DSL renders without panicking.
    let _ = plan.compiled.to_dsl();
});
