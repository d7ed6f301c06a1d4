//! Repository implementations
//!
//! One repository per aggregate. Each holds a pool handle, maps rows to
//! domain types, and keeps multi-document effects inside transactions.

pub mod hospitals;
pub mod invoices;
pub mod patients;
pub mod users;

pub use hospitals::HospitalRepository;
pub use invoices::InvoiceRepository;
pub use patients::PatientRepository;
pub use users::UserRepository;

use serde::de::DeserializeOwned;

use crate::error::DatabaseError;

/// Decodes a stored enum label (e.g. `"Invoice Raised"`) into its domain
/// enum via its serde representation
pub(crate) fn decode_label<T: DeserializeOwned>(label: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(label.to_string())).map_err(|e| {
        DatabaseError::SerializationError(format!("invalid stored label '{}': {}", label, e))
    })
}
