//! SQLite-backed store, grounded on `bibank_projection::ProjectionEngine`'s
//! `sqlx::SqlitePool` setup. Every collection shares one `documents` table;
//! a document is a JSON blob keyed by `(collection, id)`, since the store
//! contract (§4.4) never requires relational joins.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use std::path::Path;

use crate::filter::{value_as_f64, AggregateOp, Filter};
use crate::{Store, StoreError};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path.as_ref().display());
        let pool = SqlitePool::connect(&db_url).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_one(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let body = serde_json::to_string(&doc)?;
        let result = sqlx::query("INSERT OR IGNORE INTO documents (collection, id, body) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| {
            let body: String = row.try_get("body")?;
            serde_json::from_str(&body).map_err(StoreError::from)
        })
        .transpose()
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query("SELECT body FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;
        let mut out = Vec::new();
        for row in rows {
            let body: String = row.try_get("body")?;
            let doc: Value = serde_json::from_str(&body)?;
            if filter.matches(&doc) {
                out.push(doc);
            }
        }
        Ok(out)
    }

    async fn update_one(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let body = serde_json::to_string(&doc)?;
        let result = sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
            .bind(body)
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let rows = sqlx::query("SELECT id, body FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;
        let mut matched_ids = Vec::new();
        for row in rows {
            let id: String = row.try_get("id")?;
            let body: String = row.try_get("body")?;
            let doc: Value = serde_json::from_str(&body)?;
            if filter.matches(&doc) {
                matched_ids.push(id);
            }
        }

        let mut removed = 0u64;
        for id in matched_ids {
            if self.delete_one(collection, &id).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn aggregate(
        &self,
        collection: &str,
        filter: &Filter,
        field: Option<&str>,
        op: AggregateOp,
    ) -> Result<f64, StoreError> {
        let matched = self.find(collection, filter).await?;
        match op {
            AggregateOp::Count => Ok(matched.len() as f64),
            AggregateOp::Sum | AggregateOp::Average => {
                let field = field.unwrap_or_default();
                let values: Vec<f64> =
                    matched.iter().filter_map(|doc| doc.get(field)).filter_map(value_as_f64).collect();
                match op {
                    AggregateOp::Sum => Ok(values.iter().sum()),
                    AggregateOp::Average => {
                        if values.is_empty() {
                            Ok(0.0)
                        } else {
                            Ok(values.iter().sum::<f64>() / values.len() as f64)
                        }
                    }
                    AggregateOp::Count => unreachable!(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_find_update_delete() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_one("users", "U-1", json!({"user_id": "U-1", "is_fraud": false})).await.unwrap();

        let found = store.find_one("users", "U-1").await.unwrap().unwrap();
        assert_eq!(found["user_id"], "U-1");

        store.update_one("users", "U-1", json!({"user_id": "U-1", "is_fraud": true})).await.unwrap();
        let found = store.find_one("users", "U-1").await.unwrap().unwrap();
        assert_eq!(found["is_fraud"], true);

        assert!(store.delete_one("users", "U-1").await.unwrap());
        assert!(store.find_one("users", "U-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_one("users", "U-1", json!({})).await.unwrap();
        let err = store.insert_one("users", "U-1", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_find_with_filter() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_one("transactions", "T-1", json!({"user_id": "U-1", "amount": 10.0})).await.unwrap();
        store.insert_one("transactions", "T-2", json!({"user_id": "U-2", "amount": 20.0})).await.unwrap();
        let results = store.find("transactions", &Filter::new().eq("user_id", "U-1")).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_many_on_documents_without_id_or_user_id_field() {
        let store = SqliteStore::in_memory().await.unwrap();
        store
            .insert_one("clusters", "C-1", json!({"cluster_id": "C-1", "members": ["U-1", "U-2"]}))
            .await
            .unwrap();
        store
            .insert_one("clusters", "C-2", json!({"cluster_id": "C-2", "members": ["U-3"]}))
            .await
            .unwrap();

        let removed = store.delete_many("clusters", &Filter::new()).await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.find("clusters", &Filter::new()).await.unwrap().is_empty());

        // re-inserting the same cluster id after a clear must succeed, not hit AlreadyExists
        store.insert_one("clusters", "C-1", json!({"cluster_id": "C-1", "members": ["U-1"]})).await.unwrap();
    }
}
