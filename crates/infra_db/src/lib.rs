//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the hospital billing system, built on SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: one repository struct per
//! aggregate, each holding a pool handle and mapping rows to domain
//! types. Multi-document effects (raising an invoice and flipping its
//! patients, deleting an invoice and releasing them) run inside a single
//! transaction so readers never observe a half-applied change.
//!
//! Derived status columns (`hospitals.status`, `invoices.status`,
//! `patients.invoice_status`) are caches: the domain recomputes them on
//! every read and write, and the stored value is only a convenience for
//! ad-hoc SQL.

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{
    HospitalRepository, InvoiceRepository, PatientRepository, UserRepository,
};

/// Runs the embedded migrations against the given pool
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
