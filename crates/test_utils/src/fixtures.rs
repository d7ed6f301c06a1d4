//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the billing system.
//! Fixtures are deterministic so assertions can rely on exact values.

use chrono::NaiveDate;
use core_kernel::{HospitalId, Money, PatientId, Rate, UserId};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A typical consultation bill
    pub fn bill_1000() -> Money {
        Money::new(dec!(1000.00))
    }

    /// A typical procedure bill
    pub fn bill_25000() -> Money {
        Money::new(dec!(25000.00))
    }

    /// Standard DCI charges deducted before the share split
    pub fn dci_100() -> Money {
        Money::new(dec!(100.00))
    }

    /// A zero amount
    pub fn zero() -> Money {
        Money::ZERO
    }

    /// The usual IP share rate
    pub fn ip_rate() -> Rate {
        Rate::from_percentage(dec!(20))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Reference "today" used by status-resolution tests
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
    }

    /// Standard MOU start date
    pub fn mou_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    /// Standard MOU end date, a year after [`Self::mou_start`]
    pub fn mou_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()
    }

    /// Standard patient visit date
    pub fn visit_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 14).unwrap()
    }

    /// Standard invoice date, after [`Self::visit_date`]
    pub fn invoice_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Deterministic hospital ID
    pub fn hospital_id() -> HospitalId {
        HospitalId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Deterministic patient ID
    pub fn patient_id() -> PatientId {
        PatientId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Deterministic user ID
    pub fn user_id() -> UserId {
        UserId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_deterministic() {
        assert_eq!(IdFixtures::hospital_id(), IdFixtures::hospital_id());
        assert_eq!(MoneyFixtures::bill_1000(), MoneyFixtures::bill_1000());
    }

    #[test]
    fn test_mou_window_is_ordered() {
        assert!(TemporalFixtures::mou_start() < TemporalFixtures::mou_end());
        assert!(TemporalFixtures::visit_date() < TemporalFixtures::invoice_date());
    }
}
