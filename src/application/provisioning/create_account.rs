//! CreateAccountHandler - admin-requested account provisioning.
//!
//! Creates the identity record first, then writes the profile document with
//! merge semantics. There is no transaction across the two external
//! systems, so a failed profile write triggers a compensating identity
//! delete: the caller must never end up with an orphaned identity.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::domain::foundation::SubjectId;
use crate::domain::user::{AccountDraft, AccountValidationError, NewAccount};
use crate::ports::{DocumentStore, IdentityError, IdentityProvider, NewIdentity};

/// Provisioning failures.
#[derive(Debug, Clone, Error)]
pub enum CreateAccountError {
    #[error(transparent)]
    InvalidInput(#[from] AccountValidationError),

    /// The profile write failed after the identity was created; the
    /// identity has been rolled back (or the rollback failure logged).
    #[error("profile write failed")]
    ProfileWriteFailed,

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// The new subject id plus the normalized values actually stored.
#[derive(Debug, Clone)]
pub struct CreateAccountResult {
    pub subject_id: SubjectId,
    pub account: NewAccount,
}

/// Handler for admin account creation.
pub struct CreateAccountHandler {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl CreateAccountHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { identity, store }
    }

    pub async fn handle(&self, draft: AccountDraft) -> Result<CreateAccountResult, CreateAccountError> {
        // 1. Normalize and validate input.
        let account = draft.normalize()?;

        // 2. Create the identity record first.
        let subject_id = self
            .identity
            .create_user(NewIdentity {
                email: account.email.clone(),
                password: account.password.clone(),
                display_name: account.name.clone(),
            })
            .await?;

        // 3. Write the profile document with merge semantics. On failure,
        //    compensate by deleting the identity created in this call.
        let profile = serde_json::to_value(account.profile(Utc::now()))
            .map_err(|_| CreateAccountError::ProfileWriteFailed)?;
        let path = format!("users/{}", subject_id);

        if let Err(e) = self.store.merge_document(&path, &profile).await {
            tracing::error!(subject_id = %subject_id, error = %e, "profile write failed; rolling back identity");
            if let Err(rollback) = self.identity.delete_user(&subject_id).await {
                // The orphaned identity needs manual reconciliation.
                tracing::error!(subject_id = %subject_id, error = %rollback, "identity rollback failed");
            }
            return Err(CreateAccountError::ProfileWriteFailed);
        }

        tracing::info!(subject_id = %subject_id, email = %account.email, "account provisioned");
        Ok(CreateAccountResult {
            subject_id,
            account,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::MockIdentityProvider;
    use crate::adapters::store::InMemoryDocumentStore;

    fn draft(email: &str) -> AccountDraft {
        AccountDraft {
            email: Some(email.to_string()),
            password: Some("secret77".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn creates_identity_then_profile() {
        let identity = Arc::new(MockIdentityProvider::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateAccountHandler::new(identity.clone(), store.clone());

        let result = handler.handle(draft("ana@example.com")).await.unwrap();

        let profile = store
            .get_sync(&format!("users/{}", result.subject_id))
            .unwrap();
        assert_eq!(profile["email"], "ana@example.com");
        assert_eq!(profile["role"], "user");
        assert_eq!(profile["plan_id"], "free");
        assert!(identity.user_exists(result.subject_id.as_str()));
    }

    #[tokio::test]
    async fn invalid_input_creates_nothing() {
        let identity = Arc::new(MockIdentityProvider::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateAccountHandler::new(identity.clone(), store.clone());

        let result = handler
            .handle(AccountDraft {
                password: Some("secret77".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(
            result,
            Err(CreateAccountError::InvalidInput(
                AccountValidationError::MissingEmail
            ))
        ));
        assert_eq!(identity.user_count(), 0);
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn profile_write_failure_rolls_back_identity() {
        let identity = Arc::new(MockIdentityProvider::new());
        let store = Arc::new(InMemoryDocumentStore::new());
        store.fail_next_write("injected write failure");
        let handler = CreateAccountHandler::new(identity.clone(), store.clone());

        let result = handler.handle(draft("ana@example.com")).await;

        assert!(matches!(result, Err(CreateAccountError::ProfileWriteFailed)));
        // No orphaned identity after the compensating delete.
        assert_eq!(identity.user_count(), 0);
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn identity_failure_surfaces_without_profile_write() {
        let identity = Arc::new(MockIdentityProvider::new());
        identity.fail_next_create("email already exists");
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = CreateAccountHandler::new(identity, store.clone());

        let result = handler.handle(draft("ana@example.com")).await;

        assert!(matches!(result, Err(CreateAccountError::Identity(_))));
        assert_eq!(store.document_count(), 0);
    }
}
