//! Document operations for PostgreSQL.
//!
//! Every collection shares the `documents` table; the `collection` column names the
//! collection, `body` holds the record as JSONB, and `seq` preserves insertion order.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{Collection, DataStoreError, Document};

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    body: Value,
    created_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id.to_string(),
            body: row.body,
            created_at: row.created_at,
        }
    }
}

fn internal(context: &str, e: sqlx::Error) -> DataStoreError {
    tracing::error!(error = %e, "database error {}", context);
    DataStoreError::Internal(e.to_string())
}

/// Takes a transaction-scoped advisory lock on `collection`.
///
/// The lock is released when the transaction commits or rolls back. Writers that check
/// and then insert hold it so the check cannot race.
pub async fn lock_collection(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
) -> SqlResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
        .bind(collection.as_str())
        .execute(&mut **tx)
        .await
        .map_err(|e| internal("locking collection", e))?;
    Ok(())
}

/// Counts the documents in `collection`.
pub async fn count(tx: &mut Transaction<'_, Postgres>, collection: Collection) -> SqlResult<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM documents
        WHERE collection = $1
        "#,
    )
    .bind(collection.as_str())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| internal("counting documents", e))?;
    Ok(count)
}

/// Inserts a document and returns its identifier.
///
/// # Examples
/// ```no_run
/// # use sectorguide::{Collection, sql};
/// # use serde_json::json;
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut tx = pool.begin().await?;
/// let id = sql::document::insert(&mut tx, Collection::Sector, &json!({"name": "Sales"})).await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
    body: &Value,
) -> SqlResult<Uuid> {
    let id = Uuid::new_v4();
    let result = sqlx::query(
        r#"
        INSERT INTO documents (id, collection, body)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(id)
    .bind(collection.as_str())
    .bind(body)
    .execute(&mut **tx)
    .await;

    match result {
        Ok(_) => Ok(id),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(DataStoreError::AlreadyExists)
        }
        Err(e) => Err(internal("inserting document", e)),
    }
}

/// Lists every document in `collection` in insertion order.
pub async fn list(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
) -> SqlResult<Vec<Document>> {
    let rows: Vec<DocumentRow> = sqlx::query_as(
        r#"
        SELECT id, body, created_at
        FROM documents
        WHERE collection = $1
        ORDER BY seq
        "#,
    )
    .bind(collection.as_str())
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| internal("listing documents", e))?;
    Ok(rows.into_iter().map(Document::from).collect())
}

/// Lists documents whose top-level string `field` equals `value`, at most `limit` of them.
pub async fn find_by_field(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
    field: &str,
    value: &str,
    limit: Option<i64>,
) -> SqlResult<Vec<Document>> {
    let rows: Vec<DocumentRow> = sqlx::query_as(
        r#"
        SELECT id, body, created_at
        FROM documents
        WHERE collection = $1 AND body ->> $2 = $3
        ORDER BY seq
        LIMIT $4
        "#,
    )
    .bind(collection.as_str())
    .bind(field)
    .bind(value)
    .bind(limit)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| internal("finding documents", e))?;
    Ok(rows.into_iter().map(Document::from).collect())
}

/// Lists documents where any of `fields` contains `needle`, ignoring case.
///
/// `strpos` matches the needle literally, so user input never reaches a pattern language.
pub async fn search(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
    fields: &[&str],
    needle: &str,
) -> SqlResult<Vec<Document>> {
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    let rows: Vec<DocumentRow> = sqlx::query_as(
        r#"
        SELECT id, body, created_at
        FROM documents
        WHERE collection = $1
          AND EXISTS (
              SELECT 1
              FROM unnest($2::text[]) AS f(name)
              WHERE strpos(lower(body ->> f.name), lower($3)) > 0
          )
        ORDER BY seq
        "#,
    )
    .bind(collection.as_str())
    .bind(fields)
    .bind(needle)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| internal("searching documents", e))?;
    Ok(rows.into_iter().map(Document::from).collect())
}

/// Names of the collections holding at least one document, sorted.
pub async fn list_collections(tx: &mut Transaction<'_, Postgres>) -> SqlResult<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT collection
        FROM documents
        ORDER BY collection
        "#,
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| internal("listing collections", e))?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::tests::setup_test_db;
    use serde_json::json;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn insert_and_list_in_order() {
        let pool = setup_test_db().await;

        let mut tx = pool.begin().await.unwrap();
        insert(&mut tx, Collection::Sector, &json!({"slug": "sales"}))
            .await
            .unwrap();
        insert(&mut tx, Collection::Sector, &json!({"slug": "design"}))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let docs = list(&mut tx, Collection::Sector).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].body["slug"], "sales");
        assert_eq!(docs[1].body["slug"], "design");
        assert_eq!(count(&mut tx, Collection::Sector).await.unwrap(), 2);
        assert_eq!(count(&mut tx, Collection::Tool).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn find_by_field_respects_limit() {
        let pool = setup_test_db().await;

        let mut tx = pool.begin().await.unwrap();
        for name in ["Gong", "Apollo AI"] {
            insert(
                &mut tx,
                Collection::Tool,
                &json!({"name": name, "sector_slug": "sales"}),
            )
            .await
            .unwrap();
        }
        let all = find_by_field(&mut tx, Collection::Tool, "sector_slug", "sales", None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        let first = find_by_field(&mut tx, Collection::Tool, "sector_slug", "sales", Some(1))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].body["name"], "Gong");
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn search_matches_any_field_ignoring_case() {
        let pool = setup_test_db().await;

        let mut tx = pool.begin().await.unwrap();
        insert(
            &mut tx,
            Collection::Tool,
            &json!({"name": "GitHub Copilot", "summary": "Code completion", "sector_slug": "engineering"}),
        )
        .await
        .unwrap();
        insert(
            &mut tx,
            Collection::Tool,
            &json!({"name": "Gong", "summary": "Revenue intelligence", "sector_slug": "sales"}),
        )
        .await
        .unwrap();

        let fields = ["name", "summary", "sector_slug"];
        let hits = search(&mut tx, Collection::Tool, &fields, "COPILOT").await.unwrap();
        assert_eq!(hits.len(), 1);
        let hits = search(&mut tx, Collection::Tool, &fields, "%").await.unwrap();
        assert!(hits.is_empty());
        let hits = search(&mut tx, Collection::Tool, &fields, "").await.unwrap();
        assert_eq!(hits.len(), 2);

        assert_eq!(list_collections(&mut tx).await.unwrap(), vec!["tool"]);
    }
}
