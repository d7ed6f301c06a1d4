//! Request/response data transfer objects
//!
//! Hospital and patient writes deserialize straight into the domain
//! input types (`NewHospital`, `NewPatient`); the DTOs here cover the
//! surfaces where the wire shape differs from the domain.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod invoice;
