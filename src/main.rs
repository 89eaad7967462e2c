//! Gastos backend - control surface for the expense tracker mobile app.
//!
//! Serves three HTTP surfaces:
//!
//! - `/admin/*` - account provisioning and deprovisioning for admins
//! - `/webhooks/payments` - Mercado Pago payment confirmations
//! - `/events/user-created` - profile bootstrap on identity creation

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use gastos_backend::adapters::gateway::{MercadoPagoConfig, MercadoPagoGateway};
use gastos_backend::adapters::http::{app_router, AdminAppState, EventsAppState, WebhookAppState};
use gastos_backend::adapters::identity::{FirebaseIdentityConfig, FirebaseIdentityProvider};
use gastos_backend::adapters::signature::UnverifiedSignatureVerifier;
use gastos_backend::adapters::store::{FirestoreConfig, FirestoreDocumentStore};
use gastos_backend::config::AppConfig;

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = AppConfig::load().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    gastos_backend::init_telemetry(&config.server.log_level);

    // Wire up adapters
    let mut identity_config = FirebaseIdentityConfig::new(
        config.identity.project_id.clone(),
        config.identity.api_key.clone(),
        config.identity.admin_token.clone(),
    );
    identity_config.jwks_cache_duration = Duration::from_secs(config.identity.jwks_cache_secs);
    let identity = Arc::new(
        FirebaseIdentityProvider::new(identity_config)
            .expect("Failed to initialize identity provider"),
    );

    let mut store_config = FirestoreConfig::new(
        config.store.project_id.clone(),
        config.store.access_token.clone(),
    );
    if let Some(base_url) = &config.store.base_url {
        store_config = store_config.with_base_url(base_url.clone());
    }
    let store = Arc::new(
        FirestoreDocumentStore::new(store_config).expect("Failed to initialize document store"),
    );

    let gateway = Arc::new(
        MercadoPagoGateway::new(MercadoPagoConfig::new(config.gateway.access_token.clone()))
            .expect("Failed to initialize payment gateway"),
    );

    let signature = Arc::new(UnverifiedSignatureVerifier::new());

    let admin_state = AdminAppState {
        identity: identity.clone(),
        store: store.clone(),
    };
    let webhook_state = WebhookAppState {
        gateway,
        store: store.clone(),
        signature,
    };
    let events_state = EventsAppState { store };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .merge(app_router(admin_state, webhook_state, events_state))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        // Gateway deliveries carry an x-request-id; generate one for
        // everything else so log lines correlate.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    // Start server
    let addr = config.server.socket_addr();
    tracing::info!("gastos backend listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
