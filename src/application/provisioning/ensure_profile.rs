//! EnsureProfileHandler - default profile bootstrap on first sign-in.
//!
//! When a previously-unknown identity signs in, a default profile is
//! written unless one already exists. The existence check makes the hook
//! safe to deliver more than once.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::foundation::SubjectId;
use crate::domain::user::{display_name_from_email, UserProfile};
use crate::ports::{DocumentStore, StoreError};

/// Fallback display name when the identity carries neither a name nor an
/// email.
const FALLBACK_DISPLAY_NAME: &str = "Usuario";

/// Identity attributes delivered by the sign-in hook.
#[derive(Debug, Clone)]
pub struct EnsureProfileCommand {
    pub subject_id: SubjectId,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Whether the profile was created or already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureProfileResult {
    Created,
    AlreadyExists,
}

/// Handler for the identity-creation side effect.
pub struct EnsureProfileHandler {
    store: Arc<dyn DocumentStore>,
}

impl EnsureProfileHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: EnsureProfileCommand,
    ) -> Result<EnsureProfileResult, StoreError> {
        let path = format!("users/{}", cmd.subject_id);

        match self.store.get_document(&path).await {
            Ok(_) => {
                tracing::debug!(subject_id = %cmd.subject_id, "profile already exists; skipping bootstrap");
                return Ok(EnsureProfileResult::AlreadyExists);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let email = cmd.email.unwrap_or_default();
        let name = cmd
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                if email.is_empty() {
                    FALLBACK_DISPLAY_NAME.to_string()
                } else {
                    display_name_from_email(&email).to_string()
                }
            });

        let profile = UserProfile::with_defaults(name, email, Utc::now());
        let doc = serde_json::to_value(profile)
            .map_err(|e| StoreError::backend(e.to_string()))?;
        self.store.set_document(&path, &doc).await?;

        tracing::info!(subject_id = %cmd.subject_id, "default profile created");
        Ok(EnsureProfileResult::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryDocumentStore;
    use serde_json::json;

    fn cmd(email: Option<&str>, name: Option<&str>) -> EnsureProfileCommand {
        EnsureProfileCommand {
            subject_id: SubjectId::new("uid-9").unwrap(),
            email: email.map(str::to_string),
            display_name: name.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn creates_default_profile_for_unknown_identity() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = EnsureProfileHandler::new(store.clone());

        let result = handler.handle(cmd(Some("leo@example.com"), None)).await.unwrap();

        assert_eq!(result, EnsureProfileResult::Created);
        let doc = store.get_sync("users/uid-9").unwrap();
        assert_eq!(doc["name"], "leo");
        assert_eq!(doc["role"], "user");
        assert_eq!(doc["plan_id"], "free");
        assert_eq!(doc["zona_horaria"], "UTC");
        assert_eq!(doc["is_active"], true);
        assert!(doc["plan_expires_at"].is_null());
    }

    #[tokio::test]
    async fn existing_profile_is_left_untouched() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert("users/uid-9", json!({"name": "custom", "plan_id": "premium"}));
        let handler = EnsureProfileHandler::new(store.clone());

        let result = handler.handle(cmd(Some("leo@example.com"), None)).await.unwrap();

        assert_eq!(result, EnsureProfileResult::AlreadyExists);
        let doc = store.get_sync("users/uid-9").unwrap();
        assert_eq!(doc["plan_id"], "premium");
    }

    #[tokio::test]
    async fn falls_back_to_generic_name_without_email() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = EnsureProfileHandler::new(store.clone());

        handler.handle(cmd(None, None)).await.unwrap();

        let doc = store.get_sync("users/uid-9").unwrap();
        assert_eq!(doc["name"], "Usuario");
        assert_eq!(doc["email"], "");
    }

    #[tokio::test]
    async fn prefers_supplied_display_name() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let handler = EnsureProfileHandler::new(store.clone());

        handler
            .handle(cmd(Some("leo@example.com"), Some("Leo M")))
            .await
            .unwrap();

        let doc = store.get_sync("users/uid-9").unwrap();
        assert_eq!(doc["name"], "Leo M");
    }
}
