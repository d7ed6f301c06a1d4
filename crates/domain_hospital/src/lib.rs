//! Hospital partner domain
//!
//! Hospital records carry the partnership agreement (MOU) window and the
//! negotiated per-service-line share percentages. The display status of a
//! hospital is always derived from the agreement dates and the manual
//! inactive flag; the persisted status column is a cache refreshed on
//! every read and write, never a second source of truth.

pub mod error;
pub mod hospital;

pub use error::HospitalError;
pub use hospital::{Hospital, HospitalStatus, NewHospital, EXPIRY_WARNING_DAYS};
