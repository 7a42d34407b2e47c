// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for bounded edit distance.
//!
//! The bounded computation must agree with a full dynamic-programming
//! distance whenever the true distance is within the bound, and report
//! `None` otherwise.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use catalog_search::fuzzy::{bounded_distance, levenshtein_within};

#[derive(Debug, Arbitrary)]
struct MatchInput {
    query: String,
    target: String,
    max: u8,
}

fn full_distance(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut curr = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        prev = curr;
    }
    prev[b.len()]
}

fuzz_target!(|input: MatchInput| {
    // Cap lengths to avoid timeouts
    let query: Vec<char> = input.query.chars().take(32).collect();
    let target: Vec<char> = input.target.chars().take(64).collect();
    let max = (input.max % 4) as usize;

    let q: String = query.iter().collect();
    let t: String = target.iter().collect();
    let expected = full_distance(&query, &target);

    match bounded_distance(&q, &t, max) {
        Some(d) => {
            assert_eq!(d, expected);
            assert!(d <= max);
        }
        None => assert!(expected > max),
    }
    assert_eq!(levenshtein_within(&q, &t, max), expected <= max);

    // Symmetry.
    assert_eq!(bounded_distance(&t, &q, max), bounded_distance(&q, &t, max));
});
