// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Elasticsearch over its REST API.
//!
//! | Operation      | Request                                   |
//! |----------------|-------------------------------------------|
//! | `search`       | `POST /{index}/_search` (query DSL body)  |
//! | `index_exists` | `HEAD /{index}`                           |
//! | `create_index` | `PUT /{index}` (settings + mappings)      |
//! | `delete_index` | `DELETE /{index}`                         |
//! | `bulk_index`   | `POST /_bulk?refresh=…` (NDJSON)          |
//!
//! Every request carries the client timeout. A timeout surfaces as
//! [`BackendError::Timeout`], any other transport failure as `Unreachable`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{BulkReport, Hit, Refresh, SearchBackend, SearchHits};
use crate::error::BackendError;
use crate::query::CompiledQuery;
use crate::schema::IndexSchema;
use crate::types::IndexDocument;

const INDEX_NOT_FOUND: &str = "index_not_found_exception";
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Elasticsearch client bound to one cluster.
#[derive(Clone)]
pub struct ElasticBackend {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ElasticBackend {
    /// Build a client for the cluster at `base_url` (e.g. `http://localhost:9200`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Unreachable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Unreachable(e.to_string())
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, BackendError> {
        request.send().await.map_err(|e| self.transport_error(e))
    }

    async fn json_body(&self, response: Response) -> Result<Value, BackendError> {
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }
}

impl fmt::Debug for ElasticBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticBackend")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// =============================================================================
// RESPONSE SHAPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<Total>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// `hits.total` is an object on 7.x and later, a bare number before that.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Total {
    Object { value: u64 },
    Count(u64),
}

impl Total {
    fn value(&self) -> u64 {
        match self {
            Total::Object { value } => *value,
            Total::Count(n) => *n,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: IndexDocument,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}

/// Pull `error.type` out of an error body, if there is one.
fn error_type(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value["error"]["type"].as_str().map(str::to_string)
}

async fn status_error(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    BackendError::Status { status, body }
}

fn bulk_body(index: &str, documents: &[IndexDocument]) -> Result<String, BackendError> {
    let mut body = String::new();
    for doc in documents {
        let action = json!({ "index": { "_index": index, "_id": doc.id.to_string() } });
        let source = serde_json::to_string(doc)
            .map_err(|e| BackendError::MalformedResponse(format!("unencodable document {}: {}", doc.id, e)))?;
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }
    Ok(body)
}

fn item_failed(item: &Value) -> bool {
    let Some(result) = item.as_object().and_then(|o| o.values().next()) else {
        return true;
    };
    result.get("error").is_some() || result["status"].as_u64().map_or(false, |s| s >= 300)
}

#[async_trait]
impl SearchBackend for ElasticBackend {
    async fn search(&self, index: &str, query: &CompiledQuery) -> Result<SearchHits, BackendError> {
        let body = query.to_dsl();
        tracing::debug!(index, query = %body, "elasticsearch search");

        let response = self
            .send(self.client.post(self.url(&format!("{}/_search", index))).json(&body))
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND && error_type(&body).as_deref() == Some(INDEX_NOT_FOUND) {
                return Err(BackendError::IndexNotFound(index.to_string()));
            }
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value = self.json_body(response).await?;
        let parsed: SearchResponse =
            serde_json::from_value(value).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        let mut hits = Vec::with_capacity(parsed.hits.hits.len());
        for raw in parsed.hits.hits {
            let id = raw
                .id
                .parse()
                .map_err(|_| BackendError::MalformedResponse(format!("non-numeric document id {:?}", raw.id)))?;
            let mut document = raw.source;
            document.id = id;
            hits.push(Hit {
                id,
                score: raw.score,
                document,
            });
        }

        let total = parsed
            .hits
            .total
            .map(|t| t.value())
            .unwrap_or(hits.len() as u64);
        Ok(SearchHits { total, hits })
    }

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        let response = self.send(self.client.head(self.url(index))).await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(status_error(response).await),
        }
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), BackendError> {
        let response = self
            .send(self.client.put(self.url(index)).json(&schema.to_body()))
            .await?;
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        if error_type(&body).as_deref() == Some(ALREADY_EXISTS) {
            return Err(BackendError::IndexAlreadyExists(index.to_string()));
        }
        Err(BackendError::Status { status, body })
    }

    async fn delete_index(&self, index: &str) -> Result<(), BackendError> {
        let response = self.send(self.client.delete(self.url(index))).await?;
        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(BackendError::IndexNotFound(index.to_string())),
            _ => Err(status_error(response).await),
        }
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[IndexDocument],
        refresh: Refresh,
    ) -> Result<BulkReport, BackendError> {
        if documents.is_empty() {
            return Ok(BulkReport::default());
        }

        let refresh = match refresh {
            Refresh::Immediate => "true",
            Refresh::Deferred => "false",
        };
        let response = self
            .send(
                self.client
                    .post(self.url(&format!("_bulk?refresh={}", refresh)))
                    .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
                    .body(bulk_body(index, documents)?),
            )
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let value = self.json_body(response).await?;
        let parsed: BulkResponse =
            serde_json::from_value(value).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

        let failed = if parsed.errors {
            parsed.items.iter().filter(|item| item_failed(item)).count()
        } else {
            0
        };
        Ok(BulkReport {
            indexed: documents.len() - failed.min(documents.len()),
            failed,
        })
    }
}
