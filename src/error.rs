// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Two collaborators can fail underneath a search: the catalog store (vocabulary
//! and product rows) and the search backend. Each gets its own error so callers
//! can tell a dead database from a dead index, and `SearchError` wraps both for
//! the request path.

use std::time::Duration;
use thiserror::Error;

/// Catalog store failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The store could not be reached or the pool timed out.
    #[error("catalog store unavailable: {0}")]
    Unavailable(String),

    /// The query ran but failed or returned rows we could not decode.
    #[error("catalog query failed: {0}")]
    Query(String),
}

/// Search backend failures.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("search backend unreachable: {0}")]
    Unreachable(String),

    #[error("search backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("search backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed search backend response: {0}")]
    MalformedResponse(String),

    #[error("index already exists: {0}")]
    IndexAlreadyExists(String),

    #[error("index not found: {0}")]
    IndexNotFound(String),
}

/// Anything that can go wrong while answering a search or running the index lifecycle.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_wraps_transparently() {
        let err: SearchError = BackendError::IndexNotFound("products".to_string()).into();
        assert_eq!(err.to_string(), "index not found: products");
    }

    #[test]
    fn test_catalog_error_wraps_transparently() {
        let err: SearchError = CatalogError::Unavailable("pool timed out".to_string()).into();
        assert!(matches!(err, SearchError::Catalog(_)));
        assert_eq!(err.to_string(), "catalog store unavailable: pool timed out");
    }
}
