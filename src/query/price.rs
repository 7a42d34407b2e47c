// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Price intent: "15000", "phone under 20000", "laptop above 50000".
//!
//! One ordered rule list, first match wins, and exactly one bound is ever
//! produced. "under" is listed before "above", so a query containing both
//! keeps only the upper bound and leaves the "above N" text in the residual.
//!
//! The keyword patterns are substring searches, not word-boundary aware:
//! "thunder 5" reads as "under 5". That mirrors how the index was queried
//! historically.

use regex::Regex;
use std::sync::LazyLock;

/// Price constraint extracted from the query text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PriceIntent {
    /// No price constraint.
    #[default]
    Unbounded,
    /// `price <= n`
    AtMost(f64),
    /// `price >= n`
    AtLeast(f64),
}

/// Result of running the extractor over normalized text.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceExtraction {
    pub intent: PriceIntent,
    /// Input with the matched price phrase removed, single-spaced.
    pub residual: String,
}

type Bound = fn(f64) -> PriceIntent;

/// Ordered (pattern, bound) rules. Each pattern captures the amount in group 1.
static PRICE_RULES: LazyLock<Vec<(Regex, Bound)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"^([0-9]+)$").expect("valid regex"), PriceIntent::AtMost as Bound),
        (Regex::new(r"under\s([0-9]+)").expect("valid regex"), PriceIntent::AtMost as Bound),
        (Regex::new(r"above\s([0-9]+)").expect("valid regex"), PriceIntent::AtLeast as Bound),
    ]
});

/// Detect a price intent in normalized text.
///
/// 1. Entire text is digits → `AtMost(n)`, residual empty
/// 2. `under <digits>` anywhere → `AtMost(n)`, phrase removed
/// 3. `above <digits>` anywhere → `AtLeast(n)`, phrase removed
/// 4. Otherwise `Unbounded`, residual unchanged
pub fn extract_price_intent(text: &str) -> PriceExtraction {
    for (pattern, bound) in PRICE_RULES.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let (Some(whole), Some(amount)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(value) = amount.as_str().parse::<f64>() else {
            continue;
        };

        let remaining = format!("{} {}", &text[..whole.start()], &text[whole.end()..]);
        return PriceExtraction {
            intent: bound(value),
            residual: collapse_whitespace(&remaining),
        };
    }

    PriceExtraction {
        intent: PriceIntent::Unbounded,
        residual: text.to_string(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
