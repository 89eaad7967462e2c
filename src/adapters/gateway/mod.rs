//! Payment gateway adapters.

mod mercado_pago;
pub mod mock;

pub use mercado_pago::{MercadoPagoConfig, MercadoPagoGateway};
pub use mock::MockPaymentGateway;
