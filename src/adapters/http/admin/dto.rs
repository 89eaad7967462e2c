//! HTTP DTOs for the admin endpoints.
//!
//! The wire format uses the camelCase field names the mobile client
//! already sends; the snake_case profile fields live in the domain layer.

use serde::{Deserialize, Serialize};

use crate::domain::user::AccountDraft;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to provision a new account. Everything except `email` and
/// `password` is optional and defaulted server-side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub plan_expires_at: Option<i64>,
    #[serde(default)]
    pub zona_horaria: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<CreateUserRequest> for AccountDraft {
    fn from(request: CreateUserRequest) -> Self {
        AccountDraft {
            email: request.email,
            password: request.password,
            name: request.name,
            role: request.role,
            plan_id: request.plan_id,
            plan_expires_at: request.plan_expires_at,
            zona_horaria: request.zona_horaria,
            is_active: request.is_active,
        }
    }
}

/// Request to deprovision an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(default)]
    pub uid: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Echo of the provisioned account with its new subject id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub uid: String,
    pub email: String,
    pub role: String,
    pub plan_id: String,
    pub plan_expires_at: Option<i64>,
    pub zona_horaria: String,
    pub is_active: bool,
}

/// Acknowledgement for a completed deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
}

/// Machine-readable error envelope: `{"error": "<code>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>) -> Self {
        Self { error: code.into() }
    }
}
