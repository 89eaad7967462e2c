//! DeleteAccountHandler - cascading account deprovisioning.
//!
//! Clears each profile subcollection in bounded-size batches (deletes
//! within a batch run concurrently, batches run sequentially to cap
//! in-flight work), then deletes the profile document, then the identity.
//! Already-missing resources are treated as success, so a failed run can
//! simply be re-invoked and will finish the job. There is no rollback.

use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;

use crate::domain::foundation::SubjectId;
use crate::ports::{DocumentStore, IdentityError, IdentityProvider, StoreError};

/// Subcollections cleared before the profile itself, in order.
pub const PROFILE_SUBCOLLECTIONS: [&str; 2] = ["categories", "expenses"];

/// Maximum number of concurrent deletes per batch.
pub const DELETE_BATCH_SIZE: usize = 500;

/// Deprovisioning failures.
#[derive(Debug, Clone, Error)]
pub enum DeleteAccountError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Handler for admin account deletion.
pub struct DeleteAccountHandler {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl DeleteAccountHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { identity, store }
    }

    pub async fn handle(&self, subject_id: &SubjectId) -> Result<(), DeleteAccountError> {
        for subcollection in PROFILE_SUBCOLLECTIONS {
            let collection = format!("users/{}/{}", subject_id, subcollection);
            self.clear_collection(&collection).await?;
        }

        // The profile document itself; already-absent is fine.
        self.delete_tolerant(&format!("users/{}", subject_id))
            .await?;

        // Finally the identity record. Absence is success; any other
        // failure is fatal and surfaces to the caller.
        match self.identity.delete_user(subject_id).await {
            Ok(()) | Err(IdentityError::NotFound) => {}
            Err(e) => {
                tracing::error!(subject_id = %subject_id, error = %e, "identity deletion failed");
                return Err(e.into());
            }
        }

        tracing::info!(subject_id = %subject_id, "account deprovisioned");
        Ok(())
    }

    /// Delete every document under `collection` in sequential batches of
    /// `DELETE_BATCH_SIZE` concurrent deletes.
    async fn clear_collection(&self, collection: &str) -> Result<(), DeleteAccountError> {
        let ids = match self.store.list_document_ids(collection).await {
            Ok(ids) => ids,
            // A collection that never existed is already empty.
            Err(StoreError::NotFound) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for batch in ids.chunks(DELETE_BATCH_SIZE) {
            try_join_all(
                batch
                    .iter()
                    .map(|id| self.delete_tolerant_owned(format!("{}/{}", collection, id))),
            )
            .await?;
        }

        Ok(())
    }

    async fn delete_tolerant(&self, path: &str) -> Result<(), StoreError> {
        match self.store.delete_document(path).await {
            Ok(()) | Err(StoreError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn delete_tolerant_owned(&self, path: String) -> Result<(), StoreError> {
        self.delete_tolerant(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::MockIdentityProvider;
    use crate::adapters::store::InMemoryDocumentStore;
    use serde_json::json;

    fn subject() -> SubjectId {
        SubjectId::new("uid-1").unwrap()
    }

    fn seeded_store(expense_count: usize) -> Arc<InMemoryDocumentStore> {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/uid-1", json!({"role": "user"}));
        store.insert("users/uid-1/categories/c1", json!({"name": "food"}));
        for i in 0..expense_count {
            store.insert(
                &format!("users/uid-1/expenses/e{}", i),
                json!({"amount": 10}),
            );
        }
        store
    }

    #[tokio::test]
    async fn deletes_subcollections_profile_and_identity() {
        let identity = Arc::new(MockIdentityProvider::new());
        identity.register_user("uid-1");
        let store = seeded_store(3);
        let handler = DeleteAccountHandler::new(identity.clone(), store.clone());

        handler.handle(&subject()).await.unwrap();

        assert_eq!(store.document_count(), 0);
        assert!(!identity.user_exists("uid-1"));
    }

    #[tokio::test]
    async fn second_invocation_succeeds_on_empty_account() {
        let identity = Arc::new(MockIdentityProvider::new());
        identity.register_user("uid-1");
        let store = seeded_store(2);
        let handler = DeleteAccountHandler::new(identity.clone(), store.clone());

        handler.handle(&subject()).await.unwrap();
        handler.handle(&subject()).await.unwrap();

        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn missing_identity_is_tolerated() {
        let identity = Arc::new(MockIdentityProvider::new());
        let store = seeded_store(1);
        let handler = DeleteAccountHandler::new(identity, store.clone());

        handler.handle(&subject()).await.unwrap();
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn large_collection_is_deleted_in_bounded_batches() {
        let identity = Arc::new(MockIdentityProvider::new());
        identity.register_user("uid-1");
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/uid-1", json!({"role": "user"}));
        for i in 0..1200 {
            store.insert(
                &format!("users/uid-1/expenses/e{:04}", i),
                json!({"amount": 1}),
            );
        }
        let handler = DeleteAccountHandler::new(identity, store.clone());

        handler.handle(&subject()).await.unwrap();

        assert_eq!(store.document_count(), 0);
        // 1200 documents at batch size 500: concurrency peaked at exactly
        // one full batch, never two batches at once.
        assert_eq!(store.max_in_flight_deletes(), DELETE_BATCH_SIZE);
        // Profile deletion happened after every subcollection delete.
        let deletes = store.delete_log();
        let profile_pos = deletes.iter().position(|p| p == "users/uid-1").unwrap();
        assert_eq!(profile_pos, deletes.len() - 1);
    }

    #[tokio::test]
    async fn identity_failure_surfaces_as_fatal() {
        let identity = Arc::new(MockIdentityProvider::new());
        identity.register_user("uid-1");
        identity.fail_next_delete("identity backend down");
        let store = seeded_store(0);
        let handler = DeleteAccountHandler::new(identity, store);

        let result = handler.handle(&subject()).await;
        assert!(matches!(result, Err(DeleteAccountError::Identity(_))));
    }
}
