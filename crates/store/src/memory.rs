//! In-memory store used when `TESTING=true` (§6), grounded on
//! `bibank_approval::ApprovalStore`'s `in_memory()` constructor - same
//! shape, no file on disk, wiped when the process exits.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::filter::{value_as_f64, AggregateOp, Filter};
use crate::{Store, StoreError};

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_one(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        if coll.contains_key(id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        coll.insert(id.to_string(), doc);
        Ok(())
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|coll| coll.get(id)).cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|coll| coll.values().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn update_one(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        if !coll.contains_key(id) {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        coll.insert(id.to_string(), doc);
        Ok(())
    }

    async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(collections.get_mut(collection).map(|coll| coll.remove(id).is_some()).unwrap_or(false))
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(coll) = collections.get_mut(collection) else { return Ok(0) };
        let to_remove: Vec<String> =
            coll.iter().filter(|(_, doc)| filter.matches(doc)).map(|(id, _)| id.clone()).collect();
        for id in &to_remove {
            coll.remove(id);
        }
        Ok(to_remove.len() as u64)
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
