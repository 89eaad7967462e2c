//! Axum router configuration for the admin endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_user, delete_user, AdminAppState};

/// Create the admin API router.
///
/// # Routes
///
/// Both require a Bearer credential whose subject has the admin role.
/// - `POST /users` - provision an account
/// - `POST /users/delete` - deprovision an account
pub fn admin_routes() -> Router<AdminAppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/delete", post(delete_user))
}
