//! Document store port.
//!
//! The core only needs get/set/merge/delete by key and "list documents under
//! a collection" from the store. No cross-collection transactions are
//! assumed available; callers that need bulk deletes batch them.
//!
//! Paths are slash-separated relative to the store root, e.g.
//! `users/{uid}` or `users/{uid}/expenses/{docId}`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by document store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The document or collection does not exist. Idempotent delete paths
    /// treat this as success.
    #[error("document not found")]
    NotFound,

    /// Any other store failure (network, auth, malformed response).
    #[error("document store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// True when the error only says the target was already absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Key/value + hierarchical-collection document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by path. `NotFound` if it does not exist.
    async fn get_document(&self, path: &str) -> Result<Value, StoreError>;

    /// Write a document, replacing any existing content at the path.
    async fn set_document(&self, path: &str, doc: &Value) -> Result<(), StoreError>;

    /// Merge the given top-level fields into the document at the path,
    /// creating it if absent. Fields not named are left untouched.
    async fn merge_document(&self, path: &str, fields: &Value) -> Result<(), StoreError>;

    /// Delete a document. `NotFound` if it was already absent.
    async fn delete_document(&self, path: &str) -> Result<(), StoreError>;

    /// List the ids of all documents directly under a collection.
    /// `NotFound` (or an empty list) for a collection that never existed.
    async fn list_document_ids(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn DocumentStore) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn DocumentStore>>();
    }

    #[test]
    fn not_found_is_distinguishable() {
        assert!(StoreError::NotFound.is_not_found());
        assert!(!StoreError::backend("boom").is_not_found());
    }
}
