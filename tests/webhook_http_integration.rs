//! Integration tests for the payment webhook endpoint.
//!
//! The responses are plain-text markers plus status codes that steer the
//! gateway's redelivery machinery; both are asserted exactly.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use gastos_backend::adapters::gateway::MockPaymentGateway;
use gastos_backend::adapters::http::{
    app_router, AdminAppState, EventsAppState, WebhookAppState,
};
use gastos_backend::adapters::identity::MockIdentityProvider;
use gastos_backend::adapters::signature::UnverifiedSignatureVerifier;
use gastos_backend::adapters::store::InMemoryDocumentStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    gateway: Arc<MockPaymentGateway>,
    store: Arc<InMemoryDocumentStore>,
}

fn test_app() -> TestApp {
    let identity = Arc::new(MockIdentityProvider::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let gateway = Arc::new(MockPaymentGateway::new());
    let signature = Arc::new(UnverifiedSignatureVerifier::new());

    let router = app_router(
        AdminAppState {
            identity,
            store: store.clone(),
        },
        WebhookAppState {
            gateway: gateway.clone(),
            store: store.clone(),
            signature,
        },
        EventsAppState {
            store: store.clone(),
        },
    );

    TestApp {
        router,
        gateway,
        store,
    }
}

async fn deliver(router: Router, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let payload = match body {
        Some(body) => Body::from(body.to_string()),
        None => Body::empty(),
    };
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(payload)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn approved_payment(uid: &str, plan_id: &str) -> Value {
    json!({
        "id": 123456,
        "status": "approved",
        "transaction_amount": 999.5,
        "metadata": {"uid": uid, "planId": plan_id}
    })
}

// =============================================================================
// Normalization outcomes
// =============================================================================

#[tokio::test]
async fn non_payment_events_are_ignored() {
    let app = test_app();

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "plan", "data": {"id": "123"}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ignored");
    assert_eq!(app.store.document_count(), 0);
}

#[tokio::test]
async fn payment_event_without_id_is_rejected() {
    let app = test_app();

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "payment"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "missing payment id");
}

#[tokio::test]
async fn legacy_query_shape_without_body_is_accepted() {
    let app = test_app();
    app.store.insert("users/u-1", json!({"plan_id": "free"}));
    app.gateway
        .register_payment("123456", approved_payment("u-1", "premium"));

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments?topic=payment&id=123456",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let profile = app.store.get_sync("users/u-1").unwrap();
    assert_eq!(profile["plan_id"], "premium");
}

// =============================================================================
// Gateway outcomes
// =============================================================================

#[tokio::test]
async fn payment_not_visible_yet_is_acknowledged() {
    let app = test_app();

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "payment", "data": {"id": "999"}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "payment not found yet");
}

#[tokio::test]
async fn unapproved_payment_is_acknowledged_without_side_effects() {
    let app = test_app();
    app.store.insert("users/u-1", json!({"plan_id": "free"}));
    app.gateway.register_payment(
        "123456",
        json!({"id": 123456, "status": "pending", "metadata": {"uid": "u-1", "planId": "premium"}}),
    );

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "payment", "data": {"id": "123456"}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "payment not approved");
    let profile = app.store.get_sync("users/u-1").unwrap();
    assert_eq!(profile["plan_id"], "free");
}

#[tokio::test]
async fn approved_payment_without_metadata_is_rejected() {
    let app = test_app();
    app.gateway
        .register_payment("123456", json!({"id": 123456, "status": "approved"}));

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "payment", "data": {"id": "123456"}})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "missing metadata");
}

#[tokio::test]
async fn gateway_failure_is_a_server_error() {
    let app = test_app();
    app.gateway.fail_next_fetch("connection reset");

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "payment", "data": {"id": "123456"}})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "error fetching payment");
    assert!(json["message"].as_str().unwrap().contains("connection reset"));
}

// =============================================================================
// Plan activation
// =============================================================================

#[tokio::test]
async fn approved_payment_activates_plan_and_records_payment() {
    let app = test_app();
    app.store.insert(
        "users/u-1",
        json!({"name": "User", "plan_id": "free", "plan_expires_at": 123}),
    );
    app.gateway
        .register_payment("123456", approved_payment("u-1", "premium"));

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "payment", "action": "payment.updated", "data": {"id": "123456"}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let profile = app.store.get_sync("users/u-1").unwrap();
    assert_eq!(profile["plan_id"], "premium");
    assert_eq!(profile["plan_expires_at"], Value::Null);
    // Merge write: untouched fields survive
    assert_eq!(profile["name"], "User");

    let record = app
        .store
        .get_sync("payments/123456")
        .expect("payment record written");
    assert_eq!(record["uid"], "u-1");
    assert_eq!(record["planId"], "premium");
    assert_eq!(record["mpPaymentId"], "123456");
    assert_eq!(record["status"], "approved");
    assert_eq!(record["amount"], 999.5);
}

#[tokio::test]
async fn redelivery_of_an_applied_payment_is_idempotent() {
    let app = test_app();
    app.store.insert("users/u-1", json!({"plan_id": "free"}));
    app.gateway
        .register_payment("123456", approved_payment("u-1", "premium"));

    let delivery = json!({"type": "payment", "data": {"id": "123456"}});
    let (status, body) = deliver(app.router.clone(), "/webhooks/payments", Some(delivery.clone())).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

    let (status, body) = deliver(app.router, "/webhooks/payments", Some(delivery)).await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

    // Exactly one profile and one payment record
    assert_eq!(app.store.document_count(), 2);
}

#[tokio::test]
async fn store_failure_during_activation_is_a_server_error() {
    let app = test_app();
    app.store.insert("users/u-1", json!({"plan_id": "free"}));
    app.gateway
        .register_payment("123456", approved_payment("u-1", "premium"));
    app.store.fail_next_write("simulated outage");

    let (status, body) = deliver(
        app.router,
        "/webhooks/payments",
        Some(json!({"type": "payment", "data": {"id": "123456"}})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "firestore error");
    assert!(json["message"].as_str().unwrap().contains("simulated outage"));
}
