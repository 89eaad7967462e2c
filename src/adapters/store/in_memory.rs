//! In-memory document store for tests and local development.
//!
//! Backed by a flat `BTreeMap` keyed by document path. Collections are
//! implicit: a document exists under a collection when its path starts with
//! `{collection}/` and the remainder contains no further slash. Deletes
//! track in-flight concurrency so batching behavior is observable in tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::{DocumentStore, StoreError};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    docs: Mutex<BTreeMap<String, Value>>,
    fail_next_write: Mutex<Option<String>>,
    delete_log: Mutex<Vec<String>>,
    in_flight_deletes: AtomicUsize,
    max_in_flight_deletes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly, bypassing the async API.
    pub fn insert(&self, path: &str, doc: Value) {
        self.docs.lock().unwrap().insert(path.to_string(), doc);
    }

    /// Read a document directly, bypassing the async API.
    pub fn get_sync(&self, path: &str) -> Option<Value> {
        self.docs.lock().unwrap().get(path).cloned()
    }

    /// List document ids under a collection, bypassing the async API.
    pub fn list_sync(&self, collection: &str) -> Vec<String> {
        let prefix = format!("{}/", collection);
        self.docs
            .lock()
            .unwrap()
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(str::to_string)
            .collect()
    }

    pub fn document_count(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    /// Make the next write (set or merge) fail with the given message.
    pub fn fail_next_write(&self, message: &str) {
        *self.fail_next_write.lock().unwrap() = Some(message.to_string());
    }

    /// Every delete issued, in completion order.
    pub fn delete_log(&self) -> Vec<String> {
        self.delete_log.lock().unwrap().clone()
    }

    /// Highest number of deletes observed in flight at once.
    pub fn max_in_flight_deletes(&self) -> usize {
        self.max_in_flight_deletes.load(Ordering::SeqCst)
    }

    fn take_write_failure(&self) -> Option<StoreError> {
        self.fail_next_write
            .lock()
            .unwrap()
            .take()
            .map(StoreError::Backend)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(&self, path: &str) -> Result<Value, StoreError> {
        self.get_sync(path).ok_or(StoreError::NotFound)
    }

    async fn set_document(&self, path: &str, doc: &Value) -> Result<(), StoreError> {
        if let Some(e) = self.take_write_failure() {
            return Err(e);
        }
        self.insert(path, doc.clone());
        Ok(())
    }

    async fn merge_document(&self, path: &str, fields: &Value) -> Result<(), StoreError> {
        if let Some(e) = self.take_write_failure() {
            return Err(e);
        }
        let mut docs = self.docs.lock().unwrap();
        let entry = docs
            .entry(path.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        match (entry.as_object_mut(), fields.as_object()) {
            (Some(existing), Some(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k.clone(), v.clone());
                }
                Ok(())
            }
            _ => Err(StoreError::backend("merge requires object documents")),
        }
    }

    async fn delete_document(&self, path: &str) -> Result<(), StoreError> {
        let in_flight = self.in_flight_deletes.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight_deletes
            .fetch_max(in_flight, Ordering::SeqCst);
        // Let the whole batch register before any delete completes, so
        // tests observe the true per-batch concurrency.
        tokio::task::yield_now().await;
        self.in_flight_deletes.fetch_sub(1, Ordering::SeqCst);

        self.delete_log.lock().unwrap().push(path.to_string());
        match self.docs.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    async fn list_document_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.list_sync(collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn merge_preserves_untouched_fields() {
        let store = InMemoryDocumentStore::new();
        store.insert("users/u", json!({"name": "ana", "plan_id": "free"}));

        store
            .merge_document("users/u", &json!({"plan_id": "premium"}))
            .await
            .unwrap();

        let doc = store.get_sync("users/u").unwrap();
        assert_eq!(doc["name"], "ana");
        assert_eq!(doc["plan_id"], "premium");
    }

    #[tokio::test]
    async fn merge_creates_missing_document() {
        let store = InMemoryDocumentStore::new();
        store
            .merge_document("users/u", &json!({"plan_id": "premium"}))
            .await
            .unwrap();
        assert_eq!(store.get_sync("users/u").unwrap()["plan_id"], "premium");
    }

    #[tokio::test]
    async fn list_only_returns_direct_children() {
        let store = InMemoryDocumentStore::new();
        store.insert("users/u", json!({}));
        store.insert("users/u/expenses/e1", json!({}));
        store.insert("users/u/expenses/e2", json!({}));
        store.insert("users/u/categories/c1", json!({}));

        let mut ids = store.list_document_ids("users/u/expenses").await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn delete_of_missing_document_is_not_found() {
        let store = InMemoryDocumentStore::new();
        assert!(matches!(
            store.delete_document("users/nope").await,
            Err(StoreError::NotFound)
        ));
    }
}
