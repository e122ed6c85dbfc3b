use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    AppState, Collection, DataStoreError, Document, DocumentStore, InMemoryDocumentStore,
    StoreSettings, seed_store,
};

/// A store whose every operation fails.
pub struct FailingDocumentStore;

fn unavailable() -> DataStoreError {
    DataStoreError::Internal("connection refused".to_string())
}

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn insert_many_if_empty(
        &self,
        _collection: Collection,
        _bodies: &[Value],
    ) -> Result<bool, DataStoreError> {
        Err(unavailable())
    }

    async fn find_all(&self, _collection: Collection) -> Result<Vec<Document>, DataStoreError> {
        Err(unavailable())
    }

    async fn find_by_field(
        &self,
        _collection: Collection,
        _field: &str,
        _value: &str,
    ) -> Result<Vec<Document>, DataStoreError> {
        Err(unavailable())
    }

    async fn search(
        &self,
        _collection: Collection,
        _fields: &[&str],
        _needle: &str,
    ) -> Result<Vec<Document>, DataStoreError> {
        Err(unavailable())
    }

    async fn list_collections(&self) -> Result<Vec<String>, DataStoreError> {
        Err(unavailable())
    }
}

/// State backed by an empty in-memory store.
pub fn memory_state() -> AppState {
    AppState::with_store(Arc::new(InMemoryDocumentStore::new()), StoreSettings::default())
}

/// State backed by an in-memory store holding the seed data.
pub async fn seeded_state() -> AppState {
    let state = memory_state();
    if let Some(store) = state.store() {
        seed_store(store.as_ref()).await.unwrap();
    }
    state
}

/// State backed by [`FailingDocumentStore`].
pub fn failing_state() -> AppState {
    AppState::with_store(Arc::new(FailingDocumentStore), StoreSettings::default())
}
