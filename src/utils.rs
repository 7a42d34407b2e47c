// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query normalization: case folding and tokenization.
//!
//! The same normalizer runs over user queries and over category names/synonyms
//! when the vocabulary is built, so both sides of the category match agree on
//! what a "word" is.

use serde::{Deserialize, Serialize};

/// How the conjunction "and" is removed during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AndStripping {
    /// Remove every literal occurrence of the substring "and", including inside
    /// words: "android" becomes "roid", "sandals" becomes "s als". This is the
    /// behavior existing clients were tuned against, so it stays the default.
    #[default]
    Substring,
    /// Drop only whole tokens equal to "and".
    Word,
}

/// Normalize a string for matching and return the canonical token sequence.
///
/// # Algorithm
///
/// 1. Lowercase
/// 2. Replace every `&` with a space
/// 3. Remove "and" (see [`AndStripping`])
/// 4. Strip everything that is not `[a-z0-9]` or whitespace
/// 5. Split on runs of whitespace (empty input yields no tokens)
///
/// Stripping happens after "and" removal, so `"a-nd"` survives as `"and"` in
/// substring mode.
pub fn tokenize(value: &str, mode: AndStripping) -> Vec<String> {
    let lowered = value.to_lowercase().replace('&', " ");
    let lowered = match mode {
        AndStripping::Substring => lowered.replace("and", " "),
        AndStripping::Word => lowered,
    };

    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    stripped
        .split_whitespace()
        .filter(|word| mode == AndStripping::Substring || *word != "and")
        .map(str::to_string)
        .collect()
}

/// Normalize a string into its canonical single-spaced form.
///
/// - "Phone Under 20,000" → "phone under 20000"
/// - "Tea & Coffee" → "tea coffee"
pub fn normalize(value: &str, mode: AndStripping) -> String {
    tokenize(value, mode).join(" ")
}

/// Split already-normalized text into tokens.
pub fn split_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
