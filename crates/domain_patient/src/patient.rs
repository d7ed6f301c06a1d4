//! Patient billing records, share arithmetic, and invoice linkage

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{HospitalId, Money, PatientId, Rate, ServiceType, UserId};

use crate::error::PatientError;

/// How the patient reached the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadType {
    New,
    Online,
    Camp,
    Review,
}

/// Marketing source of the lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Meta,
    #[serde(rename = "Credit Health")]
    CreditHealth,
    #[serde(rename = "GBR")]
    Gbr,
    Website,
    Referral,
}

/// A patient's position in the invoicing lifecycle
///
/// `ToBeRaised` and `InvoiceRaised` flip back and forth as invoices are
/// created, edited, and deleted. `NoShare` is absorbing: it is entered
/// when the share percent is set to zero and such records are never
/// offered for invoicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientInvoiceStatus {
    #[serde(rename = "To Be Raised")]
    ToBeRaised,
    #[serde(rename = "Invoice Raised")]
    InvoiceRaised,
    #[serde(rename = "No Share")]
    NoShare,
}

impl PatientInvoiceStatus {
    /// Canonical label used in API payloads and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientInvoiceStatus::ToBeRaised => "To Be Raised",
            PatientInvoiceStatus::InvoiceRaised => "Invoice Raised",
            PatientInvoiceStatus::NoShare => "No Share",
        }
    }
}

/// Derived billing amounts for a visit: `final = bill - dci`,
/// `share = final x percent / 100`
pub fn share_amounts(bill: Money, dci: Money, percent: Rate) -> (Money, Money) {
    let final_amount = bill - dci;
    let share_amount = percent.apply(final_amount);
    (final_amount, share_amount)
}

/// Input for creating or replacing a patient record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub service_type: ServiceType,
    pub lead_type: LeadType,
    pub source_type: SourceType,
    pub hospital_id: HospitalId,
    #[serde(default)]
    pub hospital_name: String,
    #[serde(default)]
    pub hospital_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub bd_name: String,
    #[serde(default)]
    pub procedure: String,
    pub bill_amount: Decimal,
    #[serde(default)]
    pub dci_charges: Decimal,
    #[serde(default)]
    pub share_percent: Decimal,
    pub patient_date: NaiveDate,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// A billable patient visit record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    pub phone: String,
    pub service_type: ServiceType,
    pub lead_type: LeadType,
    pub source_type: SourceType,
    pub hospital_id: HospitalId,
    pub hospital_name: String,
    pub hospital_address: String,
    pub city: String,
    pub area: String,
    pub doctor_name: String,
    pub bd_name: String,
    pub procedure: String,
    pub bill_amount: Money,
    pub dci_charges: Money,
    /// Derived: `bill_amount - dci_charges`
    pub final_amount: Money,
    pub share_percent: Rate,
    /// Derived: `final_amount x share_percent / 100`
    pub share_amount: Money,
    pub invoice_status: PatientInvoiceStatus,
    pub patient_date: NaiveDate,
    pub month: u32,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Owning invoice's number while committed, for traceability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Creates a patient record from validated input
    ///
    /// Derives final and share amounts; a zero share percent forces the
    /// record into the `No Share` state.
    pub fn create(input: NewPatient, created_by: Option<UserId>) -> Result<Self, PatientError> {
        if input.name.trim().is_empty() {
            return Err(PatientError::MissingName);
        }

        let bill = Money::new(input.bill_amount);
        let dci = Money::new(input.dci_charges);
        let percent = Rate::share(input.share_percent)?;
        let (final_amount, share_amount) = share_amounts(bill, dci, percent);

        let invoice_status = if percent.is_zero() {
            PatientInvoiceStatus::NoShare
        } else {
            PatientInvoiceStatus::ToBeRaised
        };

        let now = Utc::now();

        Ok(Self {
            id: PatientId::new_ordered(),
            name: input.name,
            phone: input.phone,
            service_type: input.service_type,
            lead_type: input.lead_type,
            source_type: input.source_type,
            hospital_id: input.hospital_id,
            hospital_name: input.hospital_name,
            hospital_address: input.hospital_address,
            city: input.city,
            area: input.area,
            doctor_name: input.doctor_name,
            bd_name: input.bd_name,
            procedure: input.procedure,
            bill_amount: bill,
            dci_charges: dci,
            final_amount,
            share_percent: percent,
            share_amount,
            invoice_status,
            month: input.patient_date.month(),
            year: input.patient_date.year(),
            patient_date: input.patient_date,
            remarks: input.remarks,
            invoice_number: None,
            invoice_date: None,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the editable fields from new input
    ///
    /// Re-derives the billing amounts. Setting share percent to zero
    /// moves the record to `No Share`; restoring a positive percent on a
    /// `No Share` record makes it eligible again. The invoice linkage of
    /// a committed record is left untouched.
    pub fn apply(&mut self, input: NewPatient) -> Result<(), PatientError> {
        if input.name.trim().is_empty() {
            return Err(PatientError::MissingName);
        }

        let bill = Money::new(input.bill_amount);
        let dci = Money::new(input.dci_charges);
        let percent = Rate::share(input.share_percent)?;
        let (final_amount, share_amount) = share_amounts(bill, dci, percent);

        self.name = input.name;
        self.phone = input.phone;
        self.service_type = input.service_type;
        self.lead_type = input.lead_type;
        self.source_type = input.source_type;
        self.hospital_id = input.hospital_id;
        self.hospital_name = input.hospital_name;
        self.hospital_address = input.hospital_address;
        self.city = input.city;
        self.area = input.area;
        self.doctor_name = input.doctor_name;
        self.bd_name = input.bd_name;
        self.procedure = input.procedure;
        self.bill_amount = bill;
        self.dci_charges = dci;
        self.final_amount = final_amount;
        self.share_percent = percent;
        self.share_amount = share_amount;
        self.month = input.patient_date.month();
        self.year = input.patient_date.year();
        self.patient_date = input.patient_date;
        self.remarks = input.remarks;
        self.updated_at = Utc::now();

        if percent.is_zero() {
            self.invoice_status = PatientInvoiceStatus::NoShare;
        } else if self.invoice_status == PatientInvoiceStatus::NoShare {
            self.invoice_status = PatientInvoiceStatus::ToBeRaised;
        }

        Ok(())
    }

    /// Returns true if this record can be included in a new invoice
    pub fn is_eligible_for_invoicing(&self) -> bool {
        self.invoice_status == PatientInvoiceStatus::ToBeRaised
    }

    /// Commits this patient to an invoice, stamping its number and date
    ///
    /// Only eligible (`To Be Raised`) records can be committed.
    pub fn commit_to_invoice(
        &mut self,
        invoice_number: &str,
        invoice_date: NaiveDate,
    ) -> Result<(), PatientError> {
        match self.invoice_status {
            PatientInvoiceStatus::ToBeRaised => {
                self.invoice_status = PatientInvoiceStatus::InvoiceRaised;
                self.invoice_number = Some(invoice_number.to_string());
                self.invoice_date = Some(invoice_date);
                self.updated_at = Utc::now();
                Ok(())
            }
            PatientInvoiceStatus::InvoiceRaised => Err(PatientError::NotEligible(format!(
                "already on invoice {}",
                self.invoice_number.as_deref().unwrap_or("?")
            ))),
            PatientInvoiceStatus::NoShare => {
                Err(PatientError::NotEligible("share percent is zero".to_string()))
            }
        }
    }

    /// Reverts a committed patient to eligible, clearing the stamp
    ///
    /// Called when the patient is removed from an invoice or the invoice
    /// is deleted.
    pub fn release_from_invoice(&mut self) -> Result<(), PatientError> {
        if self.invoice_status != PatientInvoiceStatus::InvoiceRaised {
            return Err(PatientError::NotCommitted);
        }

        self.invoice_status = PatientInvoiceStatus::ToBeRaised;
        self.invoice_number = None;
        self.invoice_date = None;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(percent: Decimal) -> NewPatient {
        NewPatient {
            name: "R. Kumar".to_string(),
            phone: "9840012345".to_string(),
            service_type: ServiceType::Ip,
            lead_type: LeadType::New,
            source_type: SourceType::Website,
            hospital_id: HospitalId::new(),
            hospital_name: "Apex Care".to_string(),
            hospital_address: "12 Mount Road".to_string(),
            city: "Chennai".to_string(),
            area: "Guindy".to_string(),
            doctor_name: "Dr. Mani".to_string(),
            bd_name: "S. Priya".to_string(),
            procedure: "Angiogram".to_string(),
            bill_amount: dec!(1000),
            dci_charges: dec!(100),
            share_percent: percent,
            patient_date: date(2026, 7, 14),
            remarks: None,
        }
    }

    #[test]
    fn test_share_arithmetic() {
        let patient = Patient::create(input(dec!(20)), None).unwrap();

        assert_eq!(patient.final_amount.amount(), dec!(900));
        assert_eq!(patient.share_amount.amount(), dec!(180));
        assert_eq!(patient.invoice_status, PatientInvoiceStatus::ToBeRaised);
        assert_eq!(patient.month, 7);
        assert_eq!(patient.year, 2026);
    }

    #[test]
    fn test_zero_share_forces_no_share() {
        let patient = Patient::create(input(dec!(0)), None).unwrap();
        assert_eq!(patient.invoice_status, PatientInvoiceStatus::NoShare);
        assert!(!patient.is_eligible_for_invoicing());
    }

    #[test]
    fn test_commit_and_release() {
        let mut patient = Patient::create(input(dec!(20)), None).unwrap();

        patient
            .commit_to_invoice("INV-2026-001", date(2026, 8, 1))
            .unwrap();
        assert_eq!(patient.invoice_status, PatientInvoiceStatus::InvoiceRaised);
        assert_eq!(patient.invoice_number.as_deref(), Some("INV-2026-001"));

        // Double commit is rejected.
        assert!(patient
            .commit_to_invoice("INV-2026-002", date(2026, 8, 2))
            .is_err());

        patient.release_from_invoice().unwrap();
        assert_eq!(patient.invoice_status, PatientInvoiceStatus::ToBeRaised);
        assert!(patient.invoice_number.is_none());
        assert!(patient.invoice_date.is_none());
    }

    #[test]
    fn test_no_share_cannot_commit() {
        let mut patient = Patient::create(input(dec!(0)), None).unwrap();
        assert!(patient
            .commit_to_invoice("INV-2026-001", date(2026, 8, 1))
            .is_err());
    }

    #[test]
    fn test_edit_back_to_positive_share_restores_eligibility() {
        let mut patient = Patient::create(input(dec!(0)), None).unwrap();
        patient.apply(input(dec!(15))).unwrap();
        assert_eq!(patient.invoice_status, PatientInvoiceStatus::ToBeRaised);
    }
}
