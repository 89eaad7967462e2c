//! HTTP adapters - REST API implementations.
//!
//! Each surface has its own sub-module: authenticated admin mutations,
//! unauthenticated gateway webhooks, and identity lifecycle hooks.

pub mod admin;
pub mod events;
pub mod webhook;

use axum::extract::Request;
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use admin::AdminAppState;
pub use events::EventsAppState;
pub use webhook::WebhookAppState;

/// Preflight requests are answered with `204 No Content`. The CORS layer
/// resolves them with `200 OK` and an empty body, so the status is rewritten
/// here after the layer has attached its headers.
async fn no_content_preflight(request: Request, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// Assemble the full application router.
///
/// - `/admin/*` - admin mutations (Bearer credential + admin role)
/// - `/webhooks/*` - gateway webhook deliveries (no auth)
/// - `/events/*` - identity lifecycle hooks
pub fn app_router(
    admin_state: AdminAppState,
    webhook_state: WebhookAppState,
    events_state: EventsAppState,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/admin", admin::admin_routes().with_state(admin_state))
        .nest(
            "/webhooks",
            webhook::webhook_routes().with_state(webhook_state),
        )
        .nest("/events", events::event_routes().with_state(events_state))
        .layer(cors)
        .layer(middleware::from_fn(no_content_preflight))
        .layer(TraceLayer::new_for_http())
}
