// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface.
//!
//! - `GET /api/products/search?search=&page=&limit=&catid=&sort=` → `{products, total}`
//! - `GET /` → `API is running...`
//!
//! Query parameters arrive as raw strings and are defaulted here, never
//! rejected: a page or limit that is missing, non-numeric or below 1 becomes
//! 1 or 8, a non-numeric `catid` is ignored, an unknown `sort` means relevance.
//! Numbers are read from leading digits, so `page=2abc` is page 2. A repeated
//! parameter keeps its first value.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::service::ProductSearch;
use crate::types::{SearchRequest, SortMode, DEFAULT_LIMIT, DEFAULT_PAGE};

pub const SEARCH_ROUTE: &str = "/api/products/search";
pub const HEALTH_MESSAGE: &str = "API is running...";

/// Raw query parameters of the search route.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub catid: Option<String>,
    pub sort: Option<String>,
}

impl SearchParams {
    /// Collect the known keys from decoded query pairs. Unknown keys are
    /// ignored; for a repeated key the first value wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut params.search,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "catid" => &mut params.catid,
                "sort" => &mut params.sort,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Default and type the parameters.
    pub fn into_request(self) -> SearchRequest {
        let positive = |value: Option<&str>, default: usize| {
            value
                .and_then(leading_integer)
                .filter(|n| *n >= 1)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(default)
        };

        let mut request = SearchRequest::new(self.search.unwrap_or_default())
            .page(positive(self.page.as_deref(), DEFAULT_PAGE))
            .limit(positive(self.limit.as_deref(), DEFAULT_LIMIT))
            .sort(self.sort.as_deref().map(SortMode::parse).unwrap_or_default());

        if let Some(category_id) = self.catid.as_deref().and_then(leading_integer) {
            request = request.category(category_id);
        }
        request
    }
}

/// Parse an optionally signed integer from the start of `value`, ignoring
/// leading whitespace and anything after the digits.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, rest) = match value.as_bytes().first() {
        Some(b'-') => (-1, &value[1..]),
        Some(b'+') => (1, &value[1..]),
        _ => (1, value),
    };
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(rest.len(), |(i, _)| i);
    rest[..end].parse::<i64>().ok().map(|n| sign * n)
}

async fn search_products(
    State(search): State<Arc<ProductSearch>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let request = SearchParams::from_pairs(pairs).into_request();
    match search.search(&request).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            tracing::error!(error = %e, query = %request.raw_text, "search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Search failed" })),
            )
                .into_response()
        }
    }
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Build the router.
pub fn router(search: Arc<ProductSearch>) -> Router {
    Router::new()
        .route(SEARCH_ROUTE, get(search_products))
        .route("/", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(search)
}

/// Warm up in the background and serve until the listener fails.
///
/// Requests are accepted immediately; searches issued before warm-up finishes
/// may see an empty or missing index.
pub async fn serve(search: Arc<ProductSearch>, listen: SocketAddr) -> std::io::Result<()> {
    let warm = Arc::clone(&search);
    tokio::spawn(async move {
        warm.warm_up().await;
    });

    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(%listen, "search server listening");
    axum::serve(listener, router(search)).await
}
