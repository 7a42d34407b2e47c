// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index schema: analyzer settings and field mappings, plus the idempotent
//! create-if-missing operation run at startup.
//!
//! # Field contract
//!
//! | Index field    | Catalog column | Type                     |
//! |----------------|----------------|--------------------------|
//! | `proname`      | name           | text, `custom_analyzer`  |
//! | `description`  | description    | text, `custom_analyzer`  |
//! | `price`        | price          | float                    |
//! | `catid`        | categoryId     | integer                  |
//! | `dateinserted` | insertedAt     | date                     |
//!
//! The analyzer chain is `standard` tokenizer → `lowercase` → `synonym_filter`
//! → `porter_stem`. Order matters: synonyms are matched on lowercased surface
//! forms, before stemming.
//!
//! # No migrations
//!
//! `ensure_index` only checks existence. An index created from an older schema
//! keeps its old mappings until someone runs `recreate_index` by hand.

use serde_json::{json, Map, Value};

use crate::backend::SearchBackend;
use crate::error::BackendError;

/// Default index name.
pub const DEFAULT_INDEX: &str = "products";

pub const NAME_FIELD: &str = "proname";
pub const DESCRIPTION_FIELD: &str = "description";
pub const PRICE_FIELD: &str = "price";
pub const CATEGORY_FIELD: &str = "catid";
pub const INSERTED_AT_FIELD: &str = "dateinserted";

pub const ANALYZER_NAME: &str = "custom_analyzer";
pub const SYNONYM_FILTER_NAME: &str = "synonym_filter";

/// Equivalence groups, one comma-separated rule per group.
pub const SYNONYM_GROUPS: &[&str] = &[
    "mobile, mobiles, phone, phones, smartphone, smartphones",
    "tv, television",
    "laptop, notebook",
    "earphones, earbuds, headphones, headset",
    "fridge, refrigerator",
    "ac, air conditioner",
    "book, books",
    "kitchen, cookware, utensils",
];

/// Mapping type of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Full-text, analyzed with the custom analyzer.
    Text,
    Float,
    Integer,
    Date,
}

impl FieldKind {
    fn mapping(self) -> Value {
        match self {
            FieldKind::Text => json!({ "type": "text", "analyzer": ANALYZER_NAME }),
            FieldKind::Float => json!({ "type": "float" }),
            FieldKind::Integer => json!({ "type": "integer" }),
            FieldKind::Date => json!({ "type": "date" }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Settings and mappings for the product index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub synonyms: Vec<String>,
    pub fields: Vec<FieldMapping>,
}

impl IndexSchema {
    /// The product index schema.
    pub fn products() -> Self {
        Self {
            synonyms: SYNONYM_GROUPS.iter().map(|s| s.to_string()).collect(),
            fields: vec![
                FieldMapping { name: NAME_FIELD, kind: FieldKind::Text },
                FieldMapping { name: DESCRIPTION_FIELD, kind: FieldKind::Text },
                FieldMapping { name: PRICE_FIELD, kind: FieldKind::Float },
                FieldMapping { name: CATEGORY_FIELD, kind: FieldKind::Integer },
                FieldMapping { name: INSERTED_AT_FIELD, kind: FieldKind::Date },
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the full-text fields.
    pub fn text_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Text)
            .map(|f| f.name)
    }

    /// Index creation body: `{ settings: { analysis }, mappings: { properties } }`.
    pub fn to_body(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.kind.mapping());
        }

        json!({
            "settings": {
                "analysis": {
                    "filter": {
                        SYNONYM_FILTER_NAME: {
                            "type": "synonym",
                            "synonyms": self.synonyms,
                        }
                    },
                    "analyzer": {
                        ANALYZER_NAME: {
                            "tokenizer": "standard",
                            "filter": ["lowercase", SYNONYM_FILTER_NAME, "porter_stem"],
                        }
                    }
                }
            },
            "mappings": {
                "properties": properties,
            }
        })
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::products()
    }
}

/// What `ensure_index` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created,
    AlreadyExists,
}

/// Create the index if it does not exist. Existing indexes are left untouched.
///
/// Losing a creation race to another process counts as `AlreadyExists`.
pub async fn ensure_index(
    backend: &dyn SearchBackend,
    index: &str,
    schema: &IndexSchema,
) -> Result<EnsureOutcome, BackendError> {
    if backend.index_exists(index).await? {
        tracing::info!(index, "search index already exists");
        return Ok(EnsureOutcome::AlreadyExists);
    }

    match backend.create_index(index, schema).await {
        Ok(()) => {
            tracing::info!(index, "search index created");
            Ok(EnsureOutcome::Created)
        }
        Err(BackendError::IndexAlreadyExists(_)) => Ok(EnsureOutcome::AlreadyExists),
        Err(e) => Err(e),
    }
}

/// Drop the index if present and create it from `schema`.
///
/// Destroys every indexed document; follow with a sync.
pub async fn recreate_index(
    backend: &dyn SearchBackend,
    index: &str,
    schema: &IndexSchema,
) -> Result<(), BackendError> {
    if backend.index_exists(index).await? {
        match backend.delete_index(index).await {
            Ok(()) | Err(BackendError::IndexNotFound(_)) => {}
            Err(e) => return Err(e),
        }
        tracing::info!(index, "old search index deleted");
    }
    backend.create_index(index, schema).await?;
    tracing::info!(index, "search index created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_mappings() {
        let body = IndexSchema::products().to_body();
        assert_eq!(
            body["mappings"]["properties"],
            json!({
                "proname": { "type": "text", "analyzer": "custom_analyzer" },
                "description": { "type": "text", "analyzer": "custom_analyzer" },
                "price": { "type": "float" },
                "catid": { "type": "integer" },
                "dateinserted": { "type": "date" }
            })
        );
    }

    #[test]
    fn test_analyzer_chain_order() {
        let body = IndexSchema::products().to_body();
        let analyzer = &body["settings"]["analysis"]["analyzer"]["custom_analyzer"];
        assert_eq!(analyzer["tokenizer"], "standard");
        assert_eq!(
            analyzer["filter"],
            json!(["lowercase", "synonym_filter", "porter_stem"])
        );
    }

    #[test]
    fn test_synonym_filter() {
        let body = IndexSchema::products().to_body();
        let filter = &body["settings"]["analysis"]["filter"]["synonym_filter"];
        assert_eq!(filter["type"], "synonym");
        assert_eq!(filter["synonyms"].as_array().unwrap().len(), SYNONYM_GROUPS.len());
        assert_eq!(filter["synonyms"][1], "tv, television");
    }

    #[test]
    fn test_text_fields() {
        let schema = IndexSchema::products();
        let text: Vec<_> = schema.text_fields().collect();
        assert_eq!(text, vec!["proname", "description"]);
        assert_eq!(schema.field("price").map(|f| f.kind), Some(FieldKind::Float));
        assert!(schema.field("missing").is_none());
    }
}
