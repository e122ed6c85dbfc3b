//! # Document Storage Abstraction
//!
//! This module provides the storage abstraction for sectorguide. Records live in named
//! collections (`sector`, `tool`, `comparison`) as JSON documents; relationships between
//! collections are plain string references with no integrity checks.
//!
//! ## Architecture
//!
//! The [`DocumentStore`] trait gives handlers one interface over every backend:
//!
//! - **InMemoryDocumentStore**: `Mutex<HashMap>` storage for development and tests
//! - **PgDocumentStore** (see [`crate::sql`]): JSONB documents in PostgreSQL
//!
//! ## Storage Model
//!
//! ```text
//! Collection ──┬── Document { id, body, created_at }
//!              ├── Document
//!              └── ...          (insertion order is preserved)
//! ```
//!
//! ## Usage Examples
//!
//! ```rust
//! use sectorguide::{Collection, DocumentStore, InMemoryDocumentStore};
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let store = InMemoryDocumentStore::new();
//! let inserted = store
//!     .insert_many_if_empty(Collection::Sector, &[json!({"name": "Sales", "slug": "sales"})])
//!     .await
//!     .unwrap();
//! assert!(inserted);
//!
//! let found = store
//!     .find_one_by_field(Collection::Sector, "slug", "sales")
//!     .await
//!     .unwrap();
//! assert_eq!(found.unwrap().body["name"], "Sales");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DataStoreError;

////////////////////////////////////////////// Collection //////////////////////////////////////////////

/// The named collections sectorguide stores documents in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Industry categories.
    Sector,
    /// AI products, each referencing a sector by slug.
    Tool,
    /// Curated rankings, one per sector by slug.
    Comparison,
}

impl Collection {
    /// Every collection, in seeding order.
    pub const ALL: [Collection; 3] = [Collection::Sector, Collection::Tool, Collection::Comparison];

    /// The collection's name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Sector => "sector",
            Collection::Tool => "tool",
            Collection::Comparison => "comparison",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/////////////////////////////////////////////// Document ///////////////////////////////////////////////

/// A stored document: the store-assigned identifier plus the JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: String,
    /// The record as inserted.
    pub body: Value,
    /// When the document was inserted.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Creates a document with a fresh identifier.
    pub fn new(body: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            body,
            created_at: Utc::now(),
        }
    }

    /// Deserializes the body into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DataStoreError> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            DataStoreError::SerializationError(format!("document {}: {}", self.id, e))
        })
    }

    /// Like [`Document::decode`], but logs and yields `None` for documents that do not fit `T`.
    pub fn decode_or_skip<T: DeserializeOwned>(&self) -> Option<T> {
        match self.decode() {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable document");
                None
            }
        }
    }

    fn field_str(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }
}

///////////////////////////////////////////// DocumentStore ////////////////////////////////////////////

/// Trait defining the storage interface used by the HTTP handlers.
///
/// Implementors must be thread-safe; handlers share one store as `Arc<dyn DocumentStore>`.
/// Documents are always returned in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `bodies` into `collection` only if it holds no documents.
    ///
    /// The emptiness check and the inserts happen atomically with respect to other calls,
    /// so concurrent callers never both insert.
    ///
    /// # Returns
    /// * `Ok(true)` - The collection was empty and the bodies were inserted
    /// * `Ok(false)` - The collection already had documents; nothing was inserted
    /// * `Err(DataStoreError::Internal)` - Internal storage error
    async fn insert_many_if_empty(
        &self,
        collection: Collection,
        bodies: &[Value],
    ) -> Result<bool, DataStoreError>;

    /// Lists every document in `collection`.
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, DataStoreError>;

    /// Lists the documents whose top-level string `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, DataStoreError>;

    /// Returns the first document whose top-level string `field` equals `value`.
    async fn find_one_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, DataStoreError> {
        Ok(self
            .find_by_field(collection, field, value)
            .await?
            .into_iter()
            .next())
    }

    /// Lists the documents where any of `fields` contains `needle`, ignoring case.
    ///
    /// The needle is matched literally; an empty needle matches every document that has at
    /// least one of the fields.
    async fn search(
        &self,
        collection: Collection,
        fields: &[&str],
        needle: &str,
    ) -> Result<Vec<Document>, DataStoreError>;

    /// Names of the collections that hold at least one document, sorted.
    async fn list_collections(&self) -> Result<Vec<String>, DataStoreError>;
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

///////////////////////////////////////// InMemoryDocumentStore ////////////////////////////////////////

/// Thread-safe in-memory implementation of [`DocumentStore`].
///
/// Every collection is a `Vec<Document>` behind a single `Mutex`, which makes
/// [`DocumentStore::insert_many_if_empty`] atomic.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Collection, Vec<Document>>>, DataStoreError> {
        self.collections
            .lock()
            .map_err(|_| DataStoreError::Internal("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_many_if_empty(
        &self,
        collection: Collection,
        bodies: &[Value],
    ) -> Result<bool, DataStoreError> {
        let mut collections = self.lock()?;
        let documents = collections.entry(collection).or_default();
        if !documents.is_empty() {
            return Ok(false);
        }
        documents.extend(bodies.iter().cloned().map(Document::new));
        Ok(true)
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, DataStoreError> {
        let collections = self.lock()?;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, DataStoreError> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.field_str(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn search(
        &self,
        collection: Collection,
        fields: &[&str],
        needle: &str,
    ) -> Result<Vec<Document>, DataStoreError> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| {
                        fields.iter().any(|field| {
                            d.field_str(field)
                                .map(|text| contains_ignore_case(text, needle))
                                .unwrap_or(false)
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_collections(&self) -> Result<Vec<String>, DataStoreError> {
        let collections = self.lock()?;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(collection, _)| collection.as_str().to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}
