//! Payment confirmation handlers.

mod confirm_payment;

pub use confirm_payment::{
    ConfirmPaymentCommand, ConfirmPaymentError, ConfirmPaymentHandler, ConfirmPaymentOutcome,
};
