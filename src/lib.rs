//! Gastos backend - control surface for the Gastos expense tracker app.
//!
//! Provisions and deprovisions user accounts on admin request and reconciles
//! asynchronous payment-gateway notifications with a user's subscription plan.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

use std::sync::Once;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static TELEMETRY_INIT: Once = Once::new();

/// Install the global tracing subscriber. `RUST_LOG` wins over
/// `default_filter`. Safe to call more than once; only the first call
/// installs anything.
pub fn init_telemetry(default_filter: &str) {
    TELEMETRY_INIT.call_once(|| {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter.into());

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}
