//! Patient domain errors

use core_kernel::MoneyError;
use thiserror::Error;

/// Errors raised by patient record operations
#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient name is required")]
    MissingName,

    #[error("Invalid share percentage: {0}")]
    InvalidShare(#[from] MoneyError),

    #[error("Patient is not eligible for invoicing: {0}")]
    NotEligible(String),

    #[error("Patient is not committed to an invoice")]
    NotCommitted,
}
