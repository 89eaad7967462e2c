//! User profile document and account normalization rules.
//!
//! The profile document is stored at `users/{uid}` with the wire field names
//! the mobile client reads (`plan_id`, `zona_horaria`, ...). Exactly one
//! profile exists per identity; role defaults to `"user"` and plan to
//! `"free"` on creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role string that grants access to the admin endpoints.
pub const ADMIN_ROLE: &str = "admin";

/// Default role assigned on creation.
pub const DEFAULT_ROLE: &str = "user";

/// Default plan assigned on creation.
pub const DEFAULT_PLAN_ID: &str = "free";

/// Default time zone assigned on creation.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The `users/{uid}` profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: String,
    pub plan_id: String,
    pub plan_expires_at: Option<i64>,
    pub zona_horaria: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Default profile written when a previously-unknown identity first
    /// signs in.
    pub fn with_defaults(name: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: DEFAULT_ROLE.to_string(),
            plan_id: DEFAULT_PLAN_ID.to_string(),
            plan_expires_at: None,
            zona_horaria: DEFAULT_TIMEZONE.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw, caller-supplied account fields before normalization.
///
/// Every optional field falls back to a default; only `email` and
/// `password` can fail validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountDraft {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub plan_id: Option<String>,
    pub plan_expires_at: Option<i64>,
    pub zona_horaria: Option<String>,
    pub is_active: Option<bool>,
}

/// Validation failures for account creation input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountValidationError {
    #[error("email is required")]
    MissingEmail,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    InvalidPassword,
}

/// Fully-normalized account creation input.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: String,
    pub plan_id: String,
    pub plan_expires_at: Option<i64>,
    pub zona_horaria: String,
    pub is_active: bool,
}

impl AccountDraft {
    /// Applies the normalization table: required email and password, every
    /// other field defaulted when absent or blank.
    pub fn normalize(self) -> Result<NewAccount, AccountValidationError> {
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or(AccountValidationError::MissingEmail)?;

        let password = self
            .password
            .filter(|p| p.chars().count() >= MIN_PASSWORD_LEN)
            .ok_or(AccountValidationError::InvalidPassword)?;

        let name = non_blank(self.name)
            .unwrap_or_else(|| display_name_from_email(&email).to_string());
        let role = non_blank(self.role).unwrap_or_else(|| DEFAULT_ROLE.to_string());
        let plan_id = non_blank(self.plan_id).unwrap_or_else(|| DEFAULT_PLAN_ID.to_string());
        let zona_horaria =
            non_blank(self.zona_horaria).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

        Ok(NewAccount {
            email,
            password,
            name,
            role,
            plan_id,
            plan_expires_at: self.plan_expires_at,
            zona_horaria,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

impl NewAccount {
    /// Builds the profile document to persist for this account.
    pub fn profile(&self, now: DateTime<Utc>) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            plan_id: self.plan_id.clone(),
            plan_expires_at: self.plan_expires_at,
            zona_horaria: self.zona_horaria.clone(),
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Display name derived from an email: the local part, or the email itself
/// when it contains no `@`.
pub fn display_name_from_email(email: &str) -> &str {
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local,
        _ => email,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
