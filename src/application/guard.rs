//! Admin authorization guard.
//!
//! Resolves a bearer credential to a subject id and confirms the stored
//! profile carries the admin role. Read-only; must run before any mutation
//! in the provisioning endpoints.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::SubjectId;
use crate::domain::user::ADMIN_ROLE;
use crate::ports::{DocumentStore, IdentityError, IdentityProvider, StoreError};

/// Authorization failures, ordered by how far the request got.
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    /// The Authorization header is missing or not a Bearer credential.
    #[error("missing or malformed authorization header")]
    Unauthenticated,

    /// The credential failed verification (expired or malformed).
    #[error("invalid or expired credential")]
    InvalidCredential,

    /// The subject is authenticated but its profile is missing or its role
    /// is not admin.
    #[error("subject is not an administrator")]
    Forbidden,

    /// A collaborator failed while resolving the subject or its role.
    #[error("authorization check failed: {0}")]
    Internal(String),
}

/// Guard for the admin mutation endpoints.
pub struct AdminGuard {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl AdminGuard {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { identity, store }
    }

    /// Authorize the caller from its raw `Authorization` header value.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
    ) -> Result<SubjectId, GuardError> {
        let token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GuardError::Unauthenticated)?;

        let subject_id = self.identity.verify_token(token).await.map_err(|e| match e {
            IdentityError::InvalidCredential => GuardError::InvalidCredential,
            other => {
                tracing::error!(error = %other, "identity verification failed");
                GuardError::Internal(other.to_string())
            }
        })?;

        match self
            .store
            .get_document(&format!("users/{}", subject_id))
            .await
        {
            Ok(profile) if profile.get("role").and_then(|r| r.as_str()) == Some(ADMIN_ROLE) => {
                Ok(subject_id)
            }
            Ok(_) | Err(StoreError::NotFound) => {
                tracing::warn!(subject_id = %subject_id, "non-admin subject rejected");
                Err(GuardError::Forbidden)
            }
            Err(e) => {
                tracing::error!(subject_id = %subject_id, error = %e, "role lookup failed");
                Err(GuardError::Internal(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::identity::MockIdentityProvider;
    use crate::adapters::store::InMemoryDocumentStore;
    use serde_json::json;

    fn guard_with(role: Option<&str>) -> AdminGuard {
        let identity = MockIdentityProvider::new();
        identity.register_token("good-token", "uid-1");
        let store = InMemoryDocumentStore::new();
        if let Some(role) = role {
            store.insert("users/uid-1", json!({"role": role, "email": "a@b.c"}));
        }
        AdminGuard::new(Arc::new(identity), Arc::new(store))
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let guard = guard_with(Some("admin"));
        assert!(matches!(
            guard.authorize(None).await,
            Err(GuardError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn non_bearer_header_is_unauthenticated() {
        let guard = guard_with(Some("admin"));
        assert!(matches!(
            guard.authorize(Some("Basic abc")).await,
            Err(GuardError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn unknown_token_is_invalid_credential() {
        let guard = guard_with(Some("admin"));
        assert!(matches!(
            guard.authorize(Some("Bearer bad-token")).await,
            Err(GuardError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn non_admin_role_is_forbidden() {
        let guard = guard_with(Some("user"));
        assert!(matches!(
            guard.authorize(Some("Bearer good-token")).await,
            Err(GuardError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn missing_profile_is_forbidden() {
        let guard = guard_with(None);
        assert!(matches!(
            guard.authorize(Some("Bearer good-token")).await,
            Err(GuardError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn admin_role_authorizes() {
        let guard = guard_with(Some("admin"));
        let subject = guard.authorize(Some("Bearer good-token")).await.unwrap();
        assert_eq!(subject.as_str(), "uid-1");
    }
}
