//! Strongly-typed identifiers for domain entities
//!
//! Newtype wrappers around UUIDs prevent a hospital id from being passed
//! where a patient id is expected. Identifiers serialize as plain UUID
//! strings so API payloads keep the original `id` wire shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a time-ordered identifier, useful for insertion-ordered rows
            pub fn new_ordered() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a hospital partner record
    HospitalId
);
entity_id!(
    /// Identifier of a patient visit/billing record
    PatientId
);
entity_id!(
    /// Identifier of an invoice (distinct from its human-readable number)
    InvoiceId
);
entity_id!(
    /// Identifier of a payment line within an invoice's ledger
    PaymentLineId
);
entity_id!(
    /// Identifier of a staff user account
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_string() {
        let id = HospitalId::new();
        let parsed: HospitalId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serializes_as_plain_uuid() {
        let id = InvoiceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let id = PatientId::from(uuid);
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }
}
