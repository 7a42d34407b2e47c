//! Sort modes over the price field.

use catalog_search::{SearchRequest, SortMode};

use crate::common::*;

fn is_sorted_by(values: &[f64], ordered: impl Fn(f64, f64) -> bool) -> bool {
    values.windows(2).all(|w| ordered(w[0], w[1]))
}

#[tokio::test]
async fn price_low_is_ascending() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("").limit(20).sort(SortMode::PriceLow)).await;
    assert_eq!(page.items.len(), 12);
    assert!(is_sorted_by(&prices(&page), |a, b| a <= b));
    assert_eq!(page.items[0].id, 9);
}

#[tokio::test]
async fn price_high_is_descending() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("").limit(20).sort(SortMode::PriceHigh)).await;
    assert!(is_sorted_by(&prices(&page), |a, b| a >= b));
    assert_eq!(page.items[0].id, 5);
}

#[tokio::test]
async fn sort_applies_across_pages() {
    let f = warmed().await;
    let first = run(&f.search, SearchRequest::new("").sort(SortMode::PriceLow)).await;
    let second = run(&f.search, SearchRequest::new("").page(2).sort(SortMode::PriceLow)).await;
    let last_of_first = prices(&first).last().copied().unwrap();
    assert!(prices(&second).iter().all(|p| *p >= last_of_first));
}

#[tokio::test]
async fn sort_with_full_text_keeps_matches_only() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("gaming").sort(SortMode::PriceLow)).await;
    assert_eq!(ids(&page), vec![11, 6, 5]);
}

#[tokio::test]
async fn unknown_sort_means_relevance() {
    let f = warmed().await;
    let relevance = run(&f.search, SearchRequest::new("gaming")).await;
    let unknown = run(&f.search, SearchRequest::new("gaming").sort(SortMode::parse("newest"))).await;
    assert_eq!(ids(&relevance), ids(&unknown));
}
