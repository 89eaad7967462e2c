//! In-memory identity provider for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::SubjectId;
use crate::ports::{IdentityError, IdentityProvider, NewIdentity};

/// Test double for `IdentityProvider`. Tokens and users are registered
/// up front; `fail_next_*` hooks let tests exercise the error paths.
#[derive(Default)]
pub struct MockIdentityProvider {
    tokens: Mutex<HashMap<String, String>>,
    users: Mutex<HashSet<String>>,
    fail_next_create: Mutex<Option<String>>,
    fail_next_delete: Mutex<Option<String>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `token` verify as `subject_id`.
    pub fn register_token(&self, token: impl Into<String>, subject_id: impl Into<String>) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.into(), subject_id.into());
    }

    /// Register an existing user account.
    pub fn register_user(&self, subject_id: impl Into<String>) {
        self.users.lock().unwrap().insert(subject_id.into());
    }

    pub fn user_exists(&self, subject_id: &str) -> bool {
        self.users.lock().unwrap().contains(subject_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Make the next `create_user` call fail with `message`.
    pub fn fail_next_create(&self, message: impl Into<String>) {
        *self.fail_next_create.lock().unwrap() = Some(message.into());
    }

    /// Make the next `delete_user` call fail with `message`.
    pub fn fail_next_delete(&self, message: impl Into<String>) {
        *self.fail_next_delete.lock().unwrap() = Some(message.into());
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<SubjectId, IdentityError> {
        let tokens = self.tokens.lock().unwrap();
        match tokens.get(token) {
            Some(subject_id) => {
                SubjectId::new(subject_id.clone()).map_err(|_| IdentityError::InvalidCredential)
            }
            None => Err(IdentityError::InvalidCredential),
        }
    }

    async fn create_user(&self, _identity: NewIdentity) -> Result<SubjectId, IdentityError> {
        if let Some(message) = self.fail_next_create.lock().unwrap().take() {
            return Err(IdentityError::other(message));
        }

        let subject_id = Uuid::new_v4().to_string();
        self.users.lock().unwrap().insert(subject_id.clone());
        SubjectId::new(subject_id).map_err(|_| IdentityError::other("uuid generation"))
    }

    async fn delete_user(&self, subject_id: &SubjectId) -> Result<(), IdentityError> {
        if let Some(message) = self.fail_next_delete.lock().unwrap().take() {
            return Err(IdentityError::other(message));
        }

        let mut users = self.users.lock().unwrap();
        if users.remove(subject_id.as_str()) {
            Ok(())
        } else {
            Err(IdentityError::NotFound)
        }
    }
}
