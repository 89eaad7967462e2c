//! HTTP handlers for the admin endpoints.
//!
//! Response codes and error strings are load-bearing: the mobile admin
//! client matches on the `error` field to pick its user-facing message.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::application::provisioning::{
    CreateAccountError, CreateAccountHandler, DeleteAccountHandler,
};
use crate::application::{AdminGuard, GuardError};
use crate::domain::foundation::SubjectId;
use crate::domain::user::AccountValidationError;
use crate::ports::{DocumentStore, IdentityProvider};

use super::dto::{
    CreateUserRequest, CreateUserResponse, DeleteUserRequest, DeleteUserResponse, ErrorResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared dependencies for the admin surface.
#[derive(Clone)]
pub struct AdminAppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn DocumentStore>,
}

impl AdminAppState {
    pub fn guard(&self) -> AdminGuard {
        AdminGuard::new(self.identity.clone(), self.store.clone())
    }

    pub fn create_account_handler(&self) -> CreateAccountHandler {
        CreateAccountHandler::new(self.identity.clone(), self.store.clone())
    }

    pub fn delete_account_handler(&self) -> DeleteAccountHandler {
        DeleteAccountHandler::new(self.identity.clone(), self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════════

/// A terminal admin API error: status plus stable error code.
pub struct AdminApiError {
    status: StatusCode,
    code: &'static str,
}

impl AdminApiError {
    fn new(status: StatusCode, code: &'static str) -> Self {
        Self { status, code }
    }
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.code))).into_response()
    }
}

impl From<GuardError> for AdminApiError {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::Unauthenticated => {
                Self::new(StatusCode::UNAUTHORIZED, "missing_auth_header")
            }
            GuardError::InvalidCredential => Self::new(StatusCode::UNAUTHORIZED, "invalid_token"),
            GuardError::Forbidden => Self::new(StatusCode::FORBIDDEN, "not_authorized"),
            GuardError::Internal(message) => {
                tracing::error!(error = %message, "authorization check failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl From<CreateAccountError> for AdminApiError {
    fn from(error: CreateAccountError) -> Self {
        match error {
            CreateAccountError::InvalidInput(AccountValidationError::MissingEmail) => {
                Self::new(StatusCode::BAD_REQUEST, "missing_email")
            }
            CreateAccountError::InvalidInput(AccountValidationError::InvalidPassword) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_password")
            }
            CreateAccountError::ProfileWriteFailed => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "firestore_write_failed")
            }
            CreateAccountError::Identity(e) => {
                tracing::error!(error = %e, "identity creation failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Bodies are parsed leniently: absent or malformed JSON degrades to an
/// empty request so field-level validation produces the specific error
/// code instead of a generic parse failure.
fn parse_body<T: serde::de::DeserializeOwned + Default>(body: &Bytes) -> T {
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_default()
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /admin/users - provision an account (identity + profile).
pub async fn create_user(
    State(state): State<AdminAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AdminApiError> {
    state
        .guard()
        .authorize(authorization_header(&headers))
        .await?;

    let request: CreateUserRequest = parse_body(&body);
    let result = state.create_account_handler().handle(request.into()).await?;

    let account = result.account;
    Ok(Json(CreateUserResponse {
        uid: result.subject_id.to_string(),
        email: account.email,
        role: account.role,
        plan_id: account.plan_id,
        plan_expires_at: account.plan_expires_at,
        zona_horaria: account.zona_horaria,
        is_active: account.is_active,
    }))
}

/// POST /admin/users/delete - deprovision an account.
///
/// Validation order is observable through status codes: a request with
/// neither credential nor uid answers 401, one with a credential but no
/// uid answers 400 before the credential is verified.
pub async fn delete_user(
    State(state): State<AdminAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AdminApiError> {
    let authorization = authorization_header(&headers)
        .filter(|h| !h.trim().is_empty())
        .ok_or(AdminApiError::new(
            StatusCode::UNAUTHORIZED,
            "missing_auth_header",
        ))?;

    let request: DeleteUserRequest = parse_body(&body);
    let uid = request
        .uid
        .filter(|uid| !uid.is_empty())
        .ok_or(AdminApiError::new(StatusCode::BAD_REQUEST, "missing_uid"))?;

    state.guard().authorize(Some(authorization)).await?;

    let subject_id = SubjectId::new(uid)
        .map_err(|_| AdminApiError::new(StatusCode::BAD_REQUEST, "missing_uid"))?;

    state
        .delete_account_handler()
        .handle(&subject_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, subject_id = %subject_id, "account deletion failed");
            AdminApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        })?;

    Ok(Json(DeleteUserResponse { success: true }))
}
