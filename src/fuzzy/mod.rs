// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy matching: typo tolerance via bounded edit distance.
//!
//! The in-process backend uses this for `fuzziness: AUTO` full-text clauses.

mod levenshtein;

pub use levenshtein::*;
