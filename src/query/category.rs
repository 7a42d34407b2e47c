// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Category inference from query words.
//!
//! Walk the vocabulary in ascending category id. The first category whose word
//! set contains any query token wins; its words are removed from the query and
//! the rest becomes the residual full-text query. Later categories are never
//! consulted, even if they would also match.

use crate::types::CategoryId;
use crate::utils::split_tokens;
use crate::vocabulary::Vocabulary;

/// Result of category inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch {
    pub category_id: Option<CategoryId>,
    /// Remaining query text, single-spaced.
    pub residual: String,
}

/// Match normalized residual text against the vocabulary.
pub fn match_category(residual: &str, vocabulary: &Vocabulary) -> CategoryMatch {
    let tokens = split_tokens(residual);

    for entry in vocabulary.entries() {
        if !tokens.iter().any(|token| entry.contains(token)) {
            continue;
        }

        let remaining: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|token| !entry.contains(token))
            .collect();
        return CategoryMatch {
            category_id: Some(entry.category_id),
            residual: remaining.join(" "),
        };
    }

    CategoryMatch {
        category_id: None,
        residual: residual.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use crate::utils::AndStripping;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_categories(
            &[
                Category::new(3, "Mobiles").synonym("phone").synonym("smartphone"),
                Category::new(1, "Accessories").synonym("phone case").synonym("charger"),
                Category::new(7, "Laptops").synonym("notebook"),
            ],
            AndStripping::Substring,
        )
    }

    #[test]
    fn test_matches_synonym_and_removes_it() {
        let out = match_category("phone", &vocabulary());
        // "phone" is also in category 1 via "phone case"; lowest id wins.
        assert_eq!(out.category_id, Some(1));
        assert_eq!(out.residual, "");
    }

    #[test]
    fn test_first_match_only_removes_that_categorys_words() {
        let out = match_category("charger notebook", &vocabulary());
        assert_eq!(out.category_id, Some(1));
        assert_eq!(out.residual, "notebook");
    }

    #[test]
    fn test_residual_keeps_order_of_unmatched_tokens() {
        let out = match_category("gaming laptops with rgb", &vocabulary());
        assert_eq!(out.category_id, Some(7));
        assert_eq!(out.residual, "gaming with rgb");
    }

    #[test]
    fn test_no_match_leaves_residual_unchanged() {
        let out = match_category("wireless mouse", &vocabulary());
        assert_eq!(out.category_id, None);
        assert_eq!(out.residual, "wireless mouse");
    }

    #[test]
    fn test_empty_residual_never_matches() {
        let out = match_category("", &vocabulary());
        assert_eq!(out.category_id, None);
        assert_eq!(out.residual, "");
    }

    #[test]
    fn test_empty_vocabulary() {
        let out = match_category("phone", &Vocabulary::default());
        assert_eq!(out.category_id, None);
        assert_eq!(out.residual, "phone");
    }

    #[test]
    fn test_exact_word_membership_only() {
        // "phones" is not in any word set; no stemming happens here.
        let out = match_category("phones", &vocabulary());
        assert_eq!(out.category_id, None);
    }
}
