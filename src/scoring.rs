// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Relevance scoring for the in-process backend.
//!
//! A multi-field match is scored "best fields": each field is scored on its
//! own and the document takes the best field score. Within a field every query
//! term contributes its best match against the field's terms:
//!
//! ```text
//! exact term        1.0
//! fuzzy, d edits    1.0 - 0.2·d
//! ```
//!
//! and the field score is `boost · Σ term scores`, provided at least
//! `minimum_should_match` percent of the query terms matched (never fewer than one).

use crate::fuzzy::{auto_fuzziness, bounded_distance};
use crate::query::Fuzziness;

/// Score for an exact term match.
pub const EXACT_TERM_SCORE: f64 = 1.0;

/// Penalty per edit for fuzzy term matches.
pub const EDIT_DISTANCE_PENALTY: f64 = 0.2;

/// Best score of `query_term` against any of `field_terms`, if it matches at all.
pub fn term_score(query_term: &str, field_terms: &[String], fuzziness: Fuzziness) -> Option<f64> {
    if field_terms.iter().any(|t| t == query_term) {
        return Some(EXACT_TERM_SCORE);
    }

    let max_edits = match fuzziness {
        Fuzziness::Off => return None,
        Fuzziness::Auto => auto_fuzziness(query_term),
    };
    if max_edits == 0 {
        return None;
    }

    field_terms
        .iter()
        .filter_map(|t| bounded_distance(query_term, t, max_edits))
        .min()
        .map(|d| EXACT_TERM_SCORE - EDIT_DISTANCE_PENALTY * d as f64)
}

/// How many of `term_count` query terms must match.
pub fn required_matches(term_count: usize, percent: u32) -> usize {
    (term_count * percent as usize / 100).max(1)
}

/// Score one field, or `None` if too few query terms matched.
pub fn field_score(
    query_terms: &[String],
    field_terms: &[String],
    boost: f64,
    fuzziness: Fuzziness,
    minimum_should_match_percent: u32,
) -> Option<f64> {
    if query_terms.is_empty() {
        return None;
    }

    let scores: Vec<f64> = query_terms
        .iter()
        .filter_map(|q| term_score(q, field_terms, fuzziness))
        .collect();

    if scores.len() < required_matches(query_terms.len(), minimum_should_match_percent) {
        return None;
    }
    Some(boost * scores.iter().sum::<f64>())
}
