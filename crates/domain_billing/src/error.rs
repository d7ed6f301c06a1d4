//! Billing domain errors

use thiserror::Error;

/// Errors raised by invoice and ledger operations
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("Invoice has no items")]
    EmptyInvoice,

    #[error("Payment line has zero paid and zero adjustment amounts")]
    ZeroValuePayment,

    #[error("Patient {0} is not on this invoice")]
    ItemNotFound(String),
}
