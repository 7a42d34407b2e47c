//! "and" removal. Substring mode is the default and keeps the known defect:
//! "and" is cut out of the middle of words. Word mode only drops the word.

use catalog_search::{AndStripping, SearchRequest, SearchSettings};

use crate::common::*;

fn word_mode() -> SearchSettings {
    SearchSettings {
        and_stripping: AndStripping::Word,
        ..SearchSettings::default()
    }
}

#[tokio::test]
async fn substring_mode_corrupts_android() {
    let f = warmed().await;
    let plan = f.search.plan(&SearchRequest::new("android tv")).await.unwrap();
    assert_eq!(plan.normalized, "roid tv");
    assert_eq!(plan.category, Some(TELEVISIONS));
    assert_eq!(plan.residual, "roid");

    let page = run(&f.search, SearchRequest::new("android tv")).await;
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn word_mode_keeps_android() {
    let f = warmed_with(word_mode()).await;
    let plan = f.search.plan(&SearchRequest::new("android tv")).await.unwrap();
    assert_eq!(plan.normalized, "android tv");
    assert_eq!(plan.residual, "android");

    let page = run(&f.search, SearchRequest::new("android tv")).await;
    assert_eq!(ids(&page), vec![8]);
}

#[tokio::test]
async fn both_modes_drop_the_conjunction() {
    for settings in [SearchSettings::default(), word_mode()] {
        let f = warmed_with(settings).await;
        let plan = f
            .search
            .plan(&SearchRequest::new("laptop above 50000 and gaming"))
            .await
            .unwrap();
        assert_eq!(plan.normalized, "laptop above 50000 gaming");
    }
}

#[tokio::test]
async fn ampersand_is_a_separator() {
    let f = warmed_with(word_mode()).await;
    let plan = f.search.plan(&SearchRequest::new("Home & Kitchen")).await.unwrap();
    assert_eq!(plan.normalized, "home kitchen");
    assert_eq!(plan.category, Some(KITCHEN));
}
