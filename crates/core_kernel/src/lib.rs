//! Core Kernel - Foundational types for the partner billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money and rate types with precise decimal arithmetic
//! - Agreement window types for MOU date handling
//! - Strongly-typed entity identifiers
//! - Shared service-line classification

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod service;
pub mod error;

pub use money::{Money, Rate, MoneyError};
pub use temporal::{AgreementWindow, TemporalError};
pub use identifiers::{HospitalId, PatientId, InvoiceId, PaymentLineId, UserId};
pub use service::ServiceType;
pub use error::CoreError;
