use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::document;
use crate::{Collection, DataStoreError, Document, DocumentStore};

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// [`DocumentStore`] backed by PostgreSQL.
///
/// Each trait call runs in its own transaction. `insert_many_if_empty` holds an advisory
/// lock on the collection for the duration of its transaction.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connects to `database_url` and applies the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, DataStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool. Migrations are assumed to have run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_many_if_empty(
        &self,
        collection: Collection,
        bodies: &[Value],
    ) -> Result<bool, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        document::lock_collection(&mut tx, collection).await?;
        if document::count(&mut tx, collection).await? > 0 {
            tx.rollback().await?;
            return Ok(false);
        }
        for body in bodies {
            document::insert(&mut tx, collection, body).await?;
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let docs = document::list(&mut tx, collection).await?;
        tx.commit().await?;
        Ok(docs)
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let docs = document::find_by_field(&mut tx, collection, field, value, None).await?;
        tx.commit().await?;
        Ok(docs)
    }

    async fn find_one_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let docs = document::find_by_field(&mut tx, collection, field, value, Some(1)).await?;
        tx.commit().await?;
        Ok(docs.into_iter().next())
    }

    async fn search(
        &self,
        collection: Collection,
        fields: &[&str],
        needle: &str,
    ) -> Result<Vec<Document>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let docs = document::search(&mut tx, collection, fields, needle).await?;
        tx.commit().await?;
        Ok(docs)
    }

    async fn list_collections(&self) -> Result<Vec<String>, DataStoreError> {
        let mut tx = self.pool.begin().await?;
        let names = document::list_collections(&mut tx).await?;
        tx.commit().await?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::tests::setup_test_db;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn insert_many_if_empty_is_one_shot() {
        let store = PgDocumentStore::from_pool(setup_test_db().await);
        let bodies = vec![json!({"slug": "sales"}), json!({"slug": "design"})];

        assert!(store.insert_many_if_empty(Collection::Sector, &bodies).await.unwrap());
        assert!(!store.insert_many_if_empty(Collection::Sector, &bodies).await.unwrap());
        assert_eq!(store.find_all(Collection::Sector).await.unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn concurrent_inserts_do_not_duplicate() {
        let store = Arc::new(PgDocumentStore::from_pool(setup_test_db().await));
        let bodies = vec![json!({"slug": "sales"}), json!({"slug": "design"})];

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let bodies = bodies.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert_many_if_empty(Collection::Sector, &bodies)
                    .await
                    .unwrap()
            }));
        }
        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(store.find_all(Collection::Sector).await.unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn find_one_returns_first_inserted() {
        let store = PgDocumentStore::from_pool(setup_test_db().await);
        let bodies = vec![
            json!({"sector_slug": "sales", "headline": "first"}),
            json!({"sector_slug": "sales", "headline": "second"}),
        ];
        store
            .insert_many_if_empty(Collection::Comparison, &bodies)
            .await
            .unwrap();
        let found = store
            .find_one_by_field(Collection::Comparison, "sector_slug", "sales")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.body["headline"], "first");
    }
}
