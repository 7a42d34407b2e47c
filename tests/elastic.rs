//! Elasticsearch client against a mock cluster.

#![cfg(feature = "elasticsearch")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use catalog_search::query::{compile, PriceIntent};
use catalog_search::{
    ensure_index, BackendError, ElasticBackend, EnsureOutcome, IndexDocument, IndexSchema,
    ProductSearch, Refresh, SearchBackend, SearchRequest, SearchSettings,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ElasticBackend {
    ElasticBackend::new(server.uri(), Duration::from_secs(2)).unwrap()
}

fn hits_body() -> serde_json::Value {
    json!({
        "took": 3,
        "hits": {
            "total": { "value": 17, "relation": "eq" },
            "hits": [
                {
                    "_index": "products",
                    "_id": "42",
                    "_score": 7.5,
                    "_source": { "proname": "X", "description": "", "price": 999.0, "catid": 3 }
                },
                {
                    "_index": "products",
                    "_id": "7",
                    "_score": 2.0,
                    "_source": { "proname": "Sony Bravia 55", "price": 64999, "catid": 3, "dateinserted": "2024-01-15" }
                }
            ]
        }
    })
}

// ============================================================================
// SEARCH
// ============================================================================

#[tokio::test]
async fn search_sends_dsl_and_parses_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/_search"))
        .and(body_partial_json(json!({
            "from": 0,
            "size": 8,
            "query": { "bool": { "filter": [{ "term": { "catid": 3 } }] } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_body()))
        .expect(1)
        .mount(&server)
        .await;

    let query = compile(&SearchRequest::new(""), PriceIntent::Unbounded, Some(3), "x");
    let hits = client(&server).search("products", &query).await.unwrap();

    assert_eq!(hits.total, 17);
    assert_eq!(hits.hits.len(), 2);
    assert_eq!(hits.hits[0].id, 42);
    assert_eq!(hits.hits[0].score, Some(7.5));

    let page = hits.into_page();
    assert_eq!(page.items[0].id, 42);
    assert_eq!(page.items[1].id, 7);
    assert_eq!(page.items[1].description, "");
}

#[tokio::test]
async fn search_on_missing_index() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/_search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "index_not_found_exception", "reason": "no such index [products]" },
            "status": 404
        })))
        .mount(&server)
        .await;

    let query = compile(&SearchRequest::new(""), PriceIntent::Unbounded, None, "");
    let err = client(&server).search("products", &query).await.unwrap_err();
    assert!(matches!(err, BackendError::IndexNotFound(_)));
}

#[tokio::test]
async fn search_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let query = compile(&SearchRequest::new(""), PriceIntent::Unbounded, None, "");
    let err = client(&server).search("products", &query).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 503, .. }));
}

#[tokio::test]
async fn malformed_search_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let query = compile(&SearchRequest::new(""), PriceIntent::Unbounded, None, "");
    let err = client(&server).search("products", &query).await.unwrap_err();
    assert!(matches!(err, BackendError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hits_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let backend = ElasticBackend::new(server.uri(), Duration::from_millis(50)).unwrap();
    let query = compile(&SearchRequest::new(""), PriceIntent::Unbounded, None, "");
    let err = backend.search("products", &query).await.unwrap_err();
    assert!(matches!(err, BackendError::Timeout(_)));
}

#[tokio::test]
async fn unreachable_cluster() {
    // Nothing listens on port 1.
    let backend = ElasticBackend::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    let err = backend.index_exists("products").await.unwrap_err();
    assert!(matches!(err, BackendError::Unreachable(_) | BackendError::Timeout(_)));
}

// ============================================================================
// ADMIN
// ============================================================================

#[tokio::test]
async fn index_exists_maps_status() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let backend = client(&server);
    assert!(backend.index_exists("products").await.unwrap());
    assert!(!backend.index_exists("missing").await.unwrap());
}

#[tokio::test]
async fn ensure_index_creates_with_schema_body() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/products"))
        .and(body_partial_json(json!({
            "settings": { "analysis": { "analyzer": { "custom_analyzer": {
                "tokenizer": "standard",
                "filter": ["lowercase", "synonym_filter", "porter_stem"]
            } } } },
            "mappings": { "properties": { "catid": { "type": "integer" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = ensure_index(&client(&server), "products", &IndexSchema::products())
        .await
        .unwrap();
    assert_eq!(outcome, EnsureOutcome::Created);
}

#[tokio::test]
async fn losing_the_creation_race_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "resource_already_exists_exception" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let outcome = ensure_index(&client(&server), "products", &IndexSchema::products())
        .await
        .unwrap();
    assert_eq!(outcome, EnsureOutcome::AlreadyExists);
}

#[tokio::test]
async fn existing_index_is_not_recreated() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let backend = client(&server);
    for _ in 0..2 {
        let outcome = ensure_index(&backend, "products", &IndexSchema::products()).await.unwrap();
        assert_eq!(outcome, EnsureOutcome::AlreadyExists);
    }
}

#[tokio::test]
async fn delete_missing_index() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).delete_index("products").await.unwrap_err();
    assert!(matches!(err, BackendError::IndexNotFound(_)));
}

// ============================================================================
// BULK
// ============================================================================

fn documents() -> Vec<IndexDocument> {
    common::sample_products().iter().take(3).map(IndexDocument::from).collect()
}

#[tokio::test]
async fn bulk_is_ndjson_with_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .and(query_param("refresh", "true"))
        .and(header("content-type", "application/x-ndjson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 5,
            "errors": false,
            "items": [
                { "index": { "_id": "1", "status": 201 } },
                { "index": { "_id": "2", "status": 201 } },
                { "index": { "_id": "3", "status": 200 } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = client(&server)
        .bulk_index("products", &documents(), Refresh::Immediate)
        .await
        .unwrap();
    assert_eq!(report.indexed, 3);
    assert_eq!(report.failed, 0);

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].contains(r#""_id":"1""#));
    assert!(lines[1].contains(r#""proname":"Samsung Galaxy M34""#));
}

#[tokio::test]
async fn bulk_partial_failure_is_counted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": true,
            "items": [
                { "index": { "_id": "1", "status": 201 } },
                { "index": { "_id": "2", "status": 400, "error": { "type": "mapper_parsing_exception" } } },
                { "index": { "_id": "3", "status": 201 } }
            ]
        })))
        .mount(&server)
        .await;

    let report = client(&server)
        .bulk_index("products", &documents(), Refresh::Immediate)
        .await
        .unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn empty_bulk_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let report = client(&server)
        .bulk_index("products", &[], Refresh::Immediate)
        .await
        .unwrap();
    assert_eq!(report.indexed, 0);
}

// ============================================================================
// SERVICE OVER ELASTICSEARCH
// ============================================================================

#[tokio::test]
async fn product_search_over_elasticsearch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/products/_search"))
        .and(body_partial_json(json!({
            "query": { "bool": {
                "must": [{ "match_all": {} }],
                "filter": [
                    { "term": { "catid": 1 } },
                    { "range": { "price": { "lte": 20000.0 } } }
                ]
            } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits_body()))
        .expect(1)
        .mount(&server)
        .await;

    let search = ProductSearch::new(
        Arc::new(common::sample_catalog()),
        Arc::new(client(&server)),
        SearchSettings::default(),
    );
    let page = search.search(&SearchRequest::new("phone under 20000")).await.unwrap();
    assert_eq!(page.total, 17);
    assert_eq!(page.items.len(), 2);
}
