// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for price-intent extraction.
//!
//! Feeds normalized text (the only input the extractor ever sees) and checks
//! that a recognized bound is a finite non-negative number and that the
//! residual only ever loses text.

#![no_main]

use libfuzzer_sys::fuzz_target;

use catalog_search::query::extract_price_intent;
use catalog_search::{normalize, AndStripping, PriceIntent};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let normalized = normalize(&raw, AndStripping::Word);

    let extraction = extract_price_intent(&normalized);

    match extraction.intent {
        PriceIntent::Unbounded => assert_eq!(extraction.residual, normalized),
        PriceIntent::AtMost(n) | PriceIntent::AtLeast(n) => {
            assert!(!n.is_nan());
            assert!(n >= 0.0);
            assert!(extraction.residual.len() < normalized.len());
        }
    }
    assert!(!extraction.residual.contains("  "));
});
