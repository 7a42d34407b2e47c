// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! MySQL catalog store.
//!
//! Schema (owned by the catalog service, read-only here):
//!
//! ```sql
//! categories        (catid INT PRIMARY KEY, catname VARCHAR)
//! category_synonyms (catid INT REFERENCES categories, synonym VARCHAR)
//! products          (prodid INT PRIMARY KEY, proname VARCHAR, description TEXT,
//!                    price DECIMAL, catid INT, dateinserted DATETIME)
//! ```
//!
//! Integer keys are cast to BIGINT and the decimal price to DOUBLE in SQL so
//! rows decode straight into `i64`/`f64`. `CAST(... AS DOUBLE)` needs MySQL 8.0.17+.

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use std::time::Duration;

use super::CatalogStore;
use crate::error::CatalogError;
use crate::types::{CategorySynonymRow, Product};

const CATEGORY_SYNONYMS_SQL: &str = r#"
    SELECT CAST(c.catid AS SIGNED) AS catid, c.catname, cs.synonym
    FROM categories c
    LEFT JOIN category_synonyms cs ON c.catid = cs.catid
"#;

const PRODUCTS_SQL: &str = r#"
    SELECT CAST(prodid AS SIGNED) AS prodid,
           proname,
           description,
           CAST(price AS DOUBLE) AS price,
           CAST(catid AS SIGNED) AS catid,
           DATE_FORMAT(dateinserted, '%Y-%m-%dT%H:%i:%s') AS dateinserted
    FROM products
    ORDER BY prodid
    LIMIT ?
"#;

/// Connection pool sizing.
///
/// Requests beyond `max_connections` wait for a free connection (up to
/// `acquire_timeout`) rather than being rejected.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Build a lazily-connecting pool. The first query opens the first connection,
    /// so a database that is down at startup does not stop the process.
    pub fn connect_lazy(url: &str, settings: &PoolSettings) -> Result<Self, CatalogError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .test_before_acquire(true)
            .connect_lazy(url)
            .map_err(map_sqlx_error)?;
        tracing::info!(max_connections = settings.max_connections, "MySQL pool created");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for MySqlCatalog {
    async fn list_categories_with_synonyms(&self) -> Result<Vec<CategorySynonymRow>, CatalogError> {
        let rows = sqlx::query(CATEGORY_SYNONYMS_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(category_row).collect()
    }

    async fn list_products(&self, limit: usize) -> Result<Vec<Product>, CatalogError> {
        let rows = sqlx::query(PRODUCTS_SQL)
            .bind(limit as u64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(product_row).collect()
    }
}

fn category_row(row: &MySqlRow) -> Result<CategorySynonymRow, CatalogError> {
    Ok(CategorySynonymRow {
        category_id: row.try_get("catid").map_err(map_sqlx_error)?,
        category_name: row.try_get("catname").map_err(map_sqlx_error)?,
        synonym: row.try_get("synonym").map_err(map_sqlx_error)?,
    })
}

fn product_row(row: &MySqlRow) -> Result<Product, CatalogError> {
    let description: Option<String> = row.try_get("description").map_err(map_sqlx_error)?;
    Ok(Product {
        id: row.try_get("prodid").map_err(map_sqlx_error)?,
        name: row.try_get("proname").map_err(map_sqlx_error)?,
        description: description.unwrap_or_default(),
        price: row.try_get("price").map_err(map_sqlx_error)?,
        category_id: row.try_get("catid").map_err(map_sqlx_error)?,
        inserted_at: row.try_get("dateinserted").map_err(map_sqlx_error)?,
    })
}

fn map_sqlx_error(err: sqlx::Error) -> CatalogError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => CatalogError::Unavailable(err.to_string()),
        other => CatalogError::Query(other.to_string()),
    }
}
