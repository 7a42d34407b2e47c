//! Page windows and totals.

use catalog_search::SearchRequest;

use crate::common::*;

#[tokio::test]
async fn first_page_of_empty_search() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("")).await;
    assert_eq!(page.items.len(), 8);
    assert_eq!(page.total, 12);
    assert_eq!(ids(&page), (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn second_page_holds_the_rest() {
    let f = warmed().await;
    let request = SearchRequest::new("").page(2).limit(8);
    assert_eq!(request.offset(), 8);

    let page = run(&f.search, request).await;
    assert_eq!(ids(&page), vec![9, 10, 11, 12]);
    assert_eq!(page.total, 12);
}

#[tokio::test]
async fn page_past_the_end_is_empty_but_total_is_kept() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("").page(5)).await;
    assert!(page.items.is_empty());
    assert_eq!(page.total, 12);
}

#[tokio::test]
async fn total_counts_filtered_matches_not_page_size() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("laptop").limit(1)).await;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total, 3);
}
