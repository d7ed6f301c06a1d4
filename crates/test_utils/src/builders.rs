//! Test Data Builders
//!
//! Builder patterns for constructing domain entities with sensible
//! defaults. Tests specify only the fields they care about and take
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{HospitalId, Money, Rate, ServiceType, UserId};
use domain_billing::{Invoice, InvoiceItem, PaymentLine};
use domain_hospital::{Hospital, NewHospital};
use domain_patient::{LeadType, NewPatient, Patient, SourceType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::TemporalFixtures;

/// Builder for hospital partner records
pub struct HospitalBuilder {
    input: NewHospital,
    created_by: Option<UserId>,
    today: NaiveDate,
}

impl Default for HospitalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HospitalBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            input: NewHospital {
                name: "Apex Care Hospital".to_string(),
                alternate_name: None,
                address: "12 Mount Road".to_string(),
                area: "Guindy".to_string(),
                city: "Chennai".to_string(),
                state: "Tamil Nadu".to_string(),
                pin_code: "600032".to_string(),
                contact_person: "Accounts".to_string(),
                phone: "044-1234567".to_string(),
                email: "accounts@apexcare.example".to_string(),
                op_share: dec!(10),
                ip_share: dec!(15),
                diagnostic_share: dec!(20),
                mou_start_date: Some(TemporalFixtures::mou_start()),
                mou_end_date: Some(TemporalFixtures::mou_end()),
                mou_file_url: None,
                manual_inactive: false,
            },
            created_by: None,
            today: TemporalFixtures::today(),
        }
    }

    /// Sets the hospital name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.input.name = name.into();
        self
    }

    /// Sets the city
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.input.city = city.into();
        self
    }

    /// Sets the MOU window; `None` leaves the window open
    pub fn with_mou(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.input.mou_start_date = start;
        self.input.mou_end_date = end;
        self
    }

    /// Sets the share percentages for all three service lines
    pub fn with_shares(mut self, op: Decimal, ip: Decimal, diagnostic: Decimal) -> Self {
        self.input.op_share = op;
        self.input.ip_share = ip;
        self.input.diagnostic_share = diagnostic;
        self
    }

    /// Marks the hospital manually inactive
    pub fn inactive(mut self) -> Self {
        self.input.manual_inactive = true;
        self
    }

    /// Sets the reference date used for status resolution
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Builds the hospital, panicking on invalid input
    pub fn build(self) -> Hospital {
        Hospital::create(self.input, self.created_by, self.today)
            .expect("builder input must be valid")
    }
}

/// Builder for patient billing records
pub struct PatientBuilder {
    input: NewPatient,
    created_by: Option<UserId>,
}

impl Default for PatientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientBuilder {
    /// Creates a builder with default values
    pub fn new() -> Self {
        Self {
            input: NewPatient {
                name: "R. Kumar".to_string(),
                phone: "9840012345".to_string(),
                service_type: ServiceType::Ip,
                lead_type: LeadType::New,
                source_type: SourceType::Website,
                hospital_id: HospitalId::new(),
                hospital_name: "Apex Care Hospital".to_string(),
                hospital_address: "12 Mount Road".to_string(),
                city: "Chennai".to_string(),
                area: "Guindy".to_string(),
                doctor_name: "Dr. Mani".to_string(),
                bd_name: "S. Priya".to_string(),
                procedure: "Angiogram".to_string(),
                bill_amount: dec!(1000),
                dci_charges: dec!(100),
                share_percent: dec!(20),
                patient_date: TemporalFixtures::visit_date(),
                remarks: None,
            },
            created_by: None,
        }
    }

    /// Sets the patient name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.input.name = name.into();
        self
    }

    /// Sets the owning hospital
    pub fn with_hospital(mut self, id: HospitalId) -> Self {
        self.input.hospital_id = id;
        self
    }

    /// Sets the service line
    pub fn with_service_type(mut self, service: ServiceType) -> Self {
        self.input.service_type = service;
        self
    }

    /// Sets bill amount, DCI charges, and share percent in one call
    pub fn with_billing(mut self, bill: Decimal, dci: Decimal, percent: Decimal) -> Self {
        self.input.bill_amount = bill;
        self.input.dci_charges = dci;
        self.input.share_percent = percent;
        self
    }

    /// Sets the visit date (month/year derive from it)
    pub fn with_visit_date(mut self, date: NaiveDate) -> Self {
        self.input.patient_date = date;
        self
    }

    /// Sets the city and area
    pub fn with_location(mut self, city: impl Into<String>, area: impl Into<String>) -> Self {
        self.input.city = city.into();
        self.input.area = area.into();
        self
    }

    /// Builds the patient, panicking on invalid input
    pub fn build(self) -> Patient {
        Patient::create(self.input, self.created_by).expect("builder input must be valid")
    }
}

/// Builder for invoices over patient snapshots
pub struct InvoiceBuilder {
    invoice_number: String,
    invoice_date: NaiveDate,
    hospital_id: HospitalId,
    hospital_name: String,
    hospital_address: String,
    hospital_city: Option<String>,
    hospital_area: Option<String>,
    items: Vec<InvoiceItem>,
    created_by: Option<UserId>,
}

impl Default for InvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder {
    /// Creates a builder with default values and no items
    pub fn new() -> Self {
        Self {
            invoice_number: "INV-2026-001".to_string(),
            invoice_date: TemporalFixtures::invoice_date(),
            hospital_id: HospitalId::new(),
            hospital_name: "Apex Care Hospital".to_string(),
            hospital_address: "12 Mount Road".to_string(),
            hospital_city: Some("Chennai".to_string()),
            hospital_area: Some("Guindy".to_string()),
            items: Vec::new(),
            created_by: None,
        }
    }

    /// Sets the invoice number
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = number.into();
        self
    }

    /// Sets the invoice date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.invoice_date = date;
        self
    }

    /// Sets the billed hospital
    pub fn with_hospital(mut self, id: HospitalId) -> Self {
        self.hospital_id = id;
        self
    }

    /// Adds an item snapshotted from a patient record
    pub fn with_patient(mut self, patient: &Patient) -> Self {
        self.items.push(InvoiceItem::from_patient(patient));
        self
    }

    /// Adds a minimal item carrying the given share amount
    pub fn with_share(mut self, share: Decimal) -> Self {
        let patient = PatientBuilder::new()
            .with_hospital(self.hospital_id)
            .with_billing(share * dec!(5), dec!(0), dec!(20))
            .build();
        let mut item = InvoiceItem::from_patient(&patient);
        item.share_amount = Money::new(share);
        self.items.push(item);
        self
    }

    /// Builds the invoice, panicking on invalid input
    pub fn build(self) -> Invoice {
        Invoice::raise(
            self.invoice_number,
            self.invoice_date,
            self.hospital_id,
            self.hospital_name,
            self.hospital_address,
            self.hospital_city,
            self.hospital_area,
            self.items,
            self.created_by,
        )
        .expect("builder input must be valid")
    }
}

/// Shorthand for a payment line with the given component amounts
pub fn payment_line(date: NaiveDate, paid: Decimal, tds: Decimal, adjustment: Decimal) -> PaymentLine {
    PaymentLine::new(
        date,
        Money::new(paid),
        Rate::ZERO,
        Money::new(tds),
        Money::new(adjustment),
        "",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_hospital::HospitalStatus;
    use domain_patient::PatientInvoiceStatus;

    #[test]
    fn test_hospital_builder_defaults_are_active() {
        let hospital = HospitalBuilder::new().build();
        assert_eq!(hospital.status, HospitalStatus::Active);
    }

    #[test]
    fn test_patient_builder_derives_share() {
        let patient = PatientBuilder::new().build();
        assert_eq!(patient.final_amount.amount(), dec!(900));
        assert_eq!(patient.share_amount.amount(), dec!(180));
        assert_eq!(patient.invoice_status, PatientInvoiceStatus::ToBeRaised);
    }

    #[test]
    fn test_invoice_builder_totals_items() {
        let invoice = InvoiceBuilder::new()
            .with_share(dec!(600))
            .with_share(dec!(400))
            .build();
        assert_eq!(invoice.total_amount.amount(), dec!(1000));
    }
}
