//! Webhook HTTP surface: payment gateway deliveries.

pub mod handlers;
pub mod routes;

pub use handlers::WebhookAppState;
pub use routes::webhook_routes;
