//! Identity provider port.
//!
//! Wraps the external identity system: bearer-credential verification and
//! the identity lifecycle used by the provisioner/deprovisioner. The
//! verifier fails closed - expired or malformed credentials are
//! `InvalidCredential`, never a silent pass.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SubjectId;

/// Errors surfaced by identity operations.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The credential is expired, malformed, or otherwise unverifiable.
    #[error("invalid or expired credential")]
    InvalidCredential,

    /// The identity does not exist. Idempotent deletion treats this as
    /// success.
    #[error("identity not found")]
    NotFound,

    /// The provider could not be reached or answered with a transport-level
    /// failure.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// Any other provider failure (rejected creation, malformed response).
    #[error("identity provider error: {0}")]
    Other(String),
}

impl IdentityError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Input for creating a new identity record.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// External identity system: verify credentials, create and delete
/// identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate a bearer credential and yield the stable subject id.
    async fn verify_token(&self, token: &str) -> Result<SubjectId, IdentityError>;

    /// Create an identity record, returning the new subject id.
    async fn create_user(&self, identity: NewIdentity) -> Result<SubjectId, IdentityError>;

    /// Delete an identity record. `NotFound` if it was already absent.
    async fn delete_user(&self, subject_id: &SubjectId) -> Result<(), IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn IdentityProvider) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn IdentityProvider>>();
    }
}
