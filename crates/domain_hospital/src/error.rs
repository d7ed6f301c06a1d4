//! Hospital domain errors

use core_kernel::{MoneyError, TemporalError};
use thiserror::Error;

/// Errors raised by hospital record operations
#[derive(Debug, Error)]
pub enum HospitalError {
    #[error("Hospital name is required")]
    MissingName,

    #[error("Invalid share percentage: {0}")]
    InvalidShare(#[from] MoneyError),

    #[error("Invalid agreement window: {0}")]
    InvalidWindow(#[from] TemporalError),
}
