// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis for the in-process index.
//!
//! Mirrors the index's `custom_analyzer` so documents and queries are reduced
//! to the same terms:
//!
//! ```text
//! "Samsung Smartphones & Air Conditioners"
//!   tokenize   → [Samsung] [Smartphones] [Air] [Conditioners]
//!   lowercase  → [samsung] [smartphones] [air] [conditioners]
//!   synonyms   → [samsung] [mobile] [air] [conditioners]
//!   stem       → [samsung] [mobil] [air] [condition]
//! ```
//!
//! Synonym groups are equivalence classes. Every variant (including multi-word
//! ones like "air conditioner") is rewritten to the group's first term, which
//! gives the same match set as expanding each term to all of its variants.
//! Longest variant wins at each position.

use rust_stemmers::{Algorithm, Stemmer};

use crate::schema::IndexSchema;

/// One variant of a synonym group, as a token sequence, and its canonical term.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SynonymRule {
    variant: Vec<String>,
    canonical: String,
}

/// Tokenizer → lowercase → synonyms → stemmer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analyzer {
    /// Sorted longest variant first.
    rules: Vec<SynonymRule>,
    stem: bool,
}

impl Analyzer {
    /// Analyzer with the given comma-separated synonym groups and stemming on.
    pub fn new<S: AsRef<str>>(synonym_groups: &[S]) -> Self {
        let mut rules = Vec::new();
        for group in synonym_groups {
            let variants: Vec<Vec<String>> = group
                .as_ref()
                .split(',')
                .map(tokenize)
                .filter(|tokens| !tokens.is_empty())
                .collect();
            let Some(first) = variants.first() else {
                continue;
            };
            let canonical = first.join("_");
            for variant in &variants {
                rules.push(SynonymRule {
                    variant: variant.clone(),
                    canonical: canonical.clone(),
                });
            }
        }
        rules.sort_by(|a, b| b.variant.len().cmp(&a.variant.len()));

        Self { rules, stem: true }
    }

    /// The analyzer described by an index schema.
    pub fn from_schema(schema: &IndexSchema) -> Self {
        Self::new(&schema.synonyms)
    }

    /// Tokenize and lowercase only. What a dynamically mapped text field gets.
    pub fn standard() -> Self {
        Self {
            rules: Vec::new(),
            stem: false,
        }
    }

    /// Reduce text to index terms.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.apply_synonyms(tokenize(text));
        if !self.stem {
            return tokens;
        }
        let stemmer = Stemmer::create(Algorithm::English);
        tokens
            .into_iter()
            .map(|token| stemmer.stem(&token).into_owned())
            .collect()
    }

    fn apply_synonyms(&self, tokens: Vec<String>) -> Vec<String> {
        if self.rules.is_empty() {
            return tokens;
        }

        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let rule = self
                .rules
                .iter()
                .find(|rule| tokens[i..].starts_with(&rule.variant));
            match rule {
                Some(rule) => {
                    out.push(rule.canonical.clone());
                    i += rule.variant.len();
                }
                None => {
                    out.push(tokens[i].clone());
                    i += 1;
                }
            }
        }
        out
    }
}

/// Split on anything that is not alphanumeric, lowercasing each token.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
