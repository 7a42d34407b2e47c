// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output for the catalog-search CLI.
//!
//! Three reports: the query plan (`--explain`), a result page, and the
//! outcome of `setup`. Each is a box of fixed-width lines. Color is plain
//! 16-color ANSI and is dropped when `NO_COLOR` is set or stdout is not a
//! TTY, so piped output stays clean.

use std::sync::OnceLock;
use std::time::Duration;

use catalog_search::{EnsureOutcome, PriceIntent, QueryPlan, ResultPage, SyncReport};

/// Width between the two vertical borders.
const BOX_WIDTH: usize = 80;

const NAME_WIDTH: usize = 38;

// ═══════════════════════════════════════════════════════════════════════════
// STYLE
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    Label,
    Name,
    Price,
    Muted,
    Warn,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Plain => "",
            Tone::Label => "\x1b[1;36m",
            Tone::Name => "\x1b[1m",
            Tone::Price => "\x1b[32m",
            Tone::Muted => "\x1b[90m",
            Tone::Warn => "\x1b[1;33m",
        }
    }
}

fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout))
}

/// One box line. Tracks its visible width separately from the escape codes.
#[derive(Debug, Default)]
struct Line {
    text: String,
    width: usize,
}

impl Line {
    fn new() -> Self {
        Self::default()
    }

    fn push(mut self, tone: Tone, segment: &str) -> Self {
        self.width += segment.chars().count();
        if tone == Tone::Plain || !colors_enabled() {
            self.text.push_str(segment);
        } else {
            self.text.push_str(tone.code());
            self.text.push_str(segment);
            self.text.push_str("\x1b[0m");
        }
        self
    }

    fn plain(self, segment: &str) -> Self {
        self.push(Tone::Plain, segment)
    }

    fn print(self) {
        let pad = BOX_WIDTH.saturating_sub(self.width);
        println!("│{}{}│", self.text, " ".repeat(pad));
    }
}

fn top(label: &str) {
    let head = Line::new().plain("─ ").push(Tone::Label, label).plain(" ");
    let rest = BOX_WIDTH.saturating_sub(head.width);
    println!("┌{}{}┐", head.text, "─".repeat(rest));
}

fn bottom() {
    println!("└{}┘", "─".repeat(BOX_WIDTH));
}

// ═══════════════════════════════════════════════════════════════════════════
// FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("₹{:.0}", price)
    } else {
        format!("₹{:.2}", price)
    }
}

pub fn price_intent_label(intent: PriceIntent) -> String {
    match intent {
        PriceIntent::Unbounded => "none".to_string(),
        PriceIntent::AtMost(n) => format!("≤ {}", format_price(n)),
        PriceIntent::AtLeast(n) => format!("≥ {}", format_price(n)),
    }
}

/// Cut to `max` chars, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

// ═══════════════════════════════════════════════════════════════════════════
// REPORTS
// ═══════════════════════════════════════════════════════════════════════════

/// How the query text was taken apart.
pub fn print_plan(plan: &QueryPlan) {
    let category = plan.category.map_or_else(|| "none".to_string(), |id| id.to_string());
    let full_text = if plan.residual.is_empty() {
        "(match all)"
    } else {
        plan.residual.as_str()
    };

    top("QUERY");
    Line::new().plain(" normalized  ").push(Tone::Name, &plan.normalized).print();
    Line::new().plain(" price       ").plain(&price_intent_label(plan.price)).print();
    Line::new().plain(" category    ").plain(&category).print();
    Line::new().plain(" full text   ").plain(full_text).print();
    bottom();
}

pub fn print_results(page: &ResultPage, page_number: usize, elapsed: Duration) {
    top(&format!("RESULTS  page {} · {} total", page_number, page.total));
    if page.items.is_empty() {
        Line::new().push(Tone::Muted, " no products matched").print();
    }
    for item in &page.items {
        let name = format!("{:<width$}", truncate(&item.name, NAME_WIDTH), width = NAME_WIDTH);
        Line::new()
            .push(Tone::Muted, &format!(" {:>6}  ", item.id))
            .push(Tone::Name, &name)
            .push(Tone::Price, &format!(" {:>12}", format_price(item.price)))
            .plain(&format!("  cat {}", item.category_id))
            .print();
    }
    Line::new()
        .push(Tone::Muted, &format!(" took {:.1} ms", elapsed.as_secs_f64() * 1000.0))
        .print();
    bottom();
}

pub fn print_setup(index: &str, outcome: Option<EnsureOutcome>, report: &SyncReport) {
    let state = match outcome {
        Some(EnsureOutcome::Created) => "created",
        Some(EnsureOutcome::AlreadyExists) => "already exists",
        None => "recreated",
    };

    top("SETUP");
    Line::new().plain(&format!(" index       {} ({})", index, state)).print();
    Line::new().plain(&format!(" read        {}", report.read)).print();
    Line::new().plain(&format!(" indexed     {}", report.indexed)).print();
    if report.failed > 0 {
        Line::new()
            .plain(" failed      ")
            .push(Tone::Warn, &report.failed.to_string())
            .print();
    }
    bottom();
}
