//! Filter composition: explicit category, inferred category, price.

use catalog_search::SearchRequest;

use crate::common::*;

#[tokio::test]
async fn explicit_category_alone() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("").category(BOOKS)).await;
    assert_eq!(page.total, 1);
    assert_eq!(ids(&page), vec![9]);
}

#[tokio::test]
async fn contradictory_categories_yield_empty_page() {
    let f = warmed().await;
    // "phone" infers Mobiles; the caller asked for Laptops.
    let page = run(&f.search, SearchRequest::new("phone").category(LAPTOPS)).await;
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn agreeing_categories_are_harmless() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("laptop").category(LAPTOPS)).await;
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn price_bounds_are_inclusive() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("tv under 22999")).await;
    assert_eq!(ids(&page), vec![8]);

    let page = run(&f.search, SearchRequest::new("tv above 64999")).await;
    assert_eq!(ids(&page), vec![7]);
}

#[tokio::test]
async fn under_wins_over_above() {
    let f = warmed().await;
    let plan = f
        .search
        .plan(&SearchRequest::new("tv above 10000 under 30000"))
        .await
        .unwrap();
    assert_eq!(plan.price, catalog_search::PriceIntent::AtMost(30000.0));
    // "above 10000" is left in the text and becomes a full-text clause.
    assert_eq!(plan.residual, "above 10000");
}

#[tokio::test]
async fn first_category_by_id_wins() {
    let f = warmed().await;
    // "notebook" is Laptops (2), "book" is Books (4): lower id wins.
    let plan = f.search.plan(&SearchRequest::new("book notebook")).await.unwrap();
    assert_eq!(plan.category, Some(LAPTOPS));
    assert_eq!(plan.residual, "book");
}
