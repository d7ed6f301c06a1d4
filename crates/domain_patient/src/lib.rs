//! Patient visit domain
//!
//! A patient record is a billable visit: the hospital it happened at, the
//! service line, the bill and DCI deduction, and the operator's share.
//! Relative to invoicing a patient moves between three states: eligible
//! (`To Be Raised`), committed to an invoice (`Invoice Raised`), and the
//! absorbing `No Share` state for zero-percent records.

pub mod error;
pub mod patient;

pub use error::PatientError;
pub use patient::{
    share_amounts, LeadType, NewPatient, Patient, PatientInvoiceStatus, SourceType,
};
