//! Axum router configuration for event endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_user_created, EventsAppState};

/// Create the events router.
///
/// # Routes
/// - `POST /user-created` - identity creation hook
pub fn event_routes() -> Router<EventsAppState> {
    Router::new().route("/user-created", post(handle_user_created))
}
