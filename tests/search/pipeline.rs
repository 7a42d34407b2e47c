//! The documented query examples, run through the whole pipeline.

use catalog_search::{Category, PriceIntent, SearchRequest};

use crate::common::*;

#[tokio::test]
async fn phone_under_20000() {
    let f = warmed().await;
    let plan = f.search.plan(&SearchRequest::new("phone under 20000")).await.unwrap();
    assert_eq!(plan.normalized, "phone under 20000");
    assert_eq!(plan.price, PriceIntent::AtMost(20000.0));
    assert_eq!(plan.category, Some(MOBILES));
    assert_eq!(plan.residual, "");

    let page = run(&f.search, SearchRequest::new("phone under 20000")).await;
    assert_eq!(page.total, 2);
    assert_eq!(ids(&page), vec![1, 2]);
}

#[tokio::test]
async fn laptop_above_50000_and_gaming() {
    let f = warmed().await;
    let plan = f
        .search
        .plan(&SearchRequest::new("laptop above 50000 and gaming"))
        .await
        .unwrap();
    assert_eq!(plan.normalized, "laptop above 50000 gaming");
    assert_eq!(plan.price, PriceIntent::AtLeast(50000.0));
    assert_eq!(plan.category, Some(LAPTOPS));
    assert_eq!(plan.residual, "gaming");

    // Name match (boost 4) outranks description match (boost 2).
    let page = run(&f.search, SearchRequest::new("laptop above 50000 and gaming")).await;
    assert_eq!(ids(&page), vec![6, 5]);
}

#[tokio::test]
async fn digits_only_is_a_price_ceiling() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("1500").limit(20)).await;
    assert_eq!(ids(&page), vec![9, 12]);
    assert!(page.items.iter().all(|item| item.price <= 1500.0));
}

#[tokio::test]
async fn index_synonyms_match_across_spellings() {
    let f = warmed().await;
    // "mobile" is not a category word, so it stays full-text and the index
    // analyzer maps it onto phone/smartphone.
    let page = run(&f.search, SearchRequest::new("mobile")).await;
    assert_eq!(page.total, 3);
    let mut found = ids(&page);
    found.sort_unstable();
    assert_eq!(found, vec![1, 2, 3]);
}

#[tokio::test]
async fn misspelled_terms_still_match() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("samsng")).await;
    assert_eq!(ids(&page), vec![1]);
}

#[tokio::test]
async fn relevance_order_breaks_ties_by_id() {
    let f = warmed().await;
    let page = run(&f.search, SearchRequest::new("gaming")).await;
    // 6 and 11 match in the name, 5 only in the description.
    assert_eq!(ids(&page), vec![6, 11, 5]);
}

#[tokio::test]
async fn vocabulary_cache_invalidation() {
    let f = warmed().await;
    let before = f.search.plan(&SearchRequest::new("mouse")).await.unwrap();
    assert_eq!(before.category, None);

    f.catalog.add_category(Category::new(8, "Peripherals").synonym("mouse"));
    let cached = f.search.plan(&SearchRequest::new("mouse")).await.unwrap();
    assert_eq!(cached.category, None);

    f.search.vocabulary().invalidate();
    let after = f.search.plan(&SearchRequest::new("mouse")).await.unwrap();
    assert_eq!(after.category, Some(8));
}
