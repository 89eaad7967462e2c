//! HTTP handlers for identity lifecycle events.
//!
//! The identity provider calls `/events/user-created` when an account
//! signs up through the app (as opposed to being provisioned by an
//! admin). The hook bootstraps a default profile if one is not already
//! present.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::provisioning::{
    EnsureProfileCommand, EnsureProfileHandler, EnsureProfileResult,
};
use crate::domain::foundation::SubjectId;
use crate::ports::DocumentStore;

/// Shared dependencies for the events surface.
#[derive(Clone)]
pub struct EventsAppState {
    pub store: Arc<dyn DocumentStore>,
}

impl EventsAppState {
    pub fn ensure_profile_handler(&self) -> EnsureProfileHandler {
        EnsureProfileHandler::new(self.store.clone())
    }
}

/// Payload delivered by the identity provider on account creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreatedEvent {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub created: bool,
}

/// POST /events/user-created - bootstrap a default profile.
pub async fn handle_user_created(
    State(state): State<EventsAppState>,
    Json(event): Json<UserCreatedEvent>,
) -> impl IntoResponse {
    let subject_id = match SubjectId::new(event.uid) {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "missing_uid"})),
            )
                .into_response();
        }
    };

    let cmd = EnsureProfileCommand {
        subject_id,
        email: event.email,
        display_name: event.display_name,
    };

    match state.ensure_profile_handler().handle(cmd).await {
        Ok(result) => Json(UserCreatedResponse {
            created: result == EnsureProfileResult::Created,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "profile bootstrap failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "internal_error"})),
            )
                .into_response()
        }
    }
}
