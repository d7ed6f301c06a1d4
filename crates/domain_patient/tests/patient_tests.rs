//! Patient lifecycle and serialization tests

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{HospitalId, ServiceType};
use domain_patient::{LeadType, NewPatient, Patient, PatientInvoiceStatus, SourceType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_patient() -> NewPatient {
    NewPatient {
        name: "A. Lakshmi".to_string(),
        phone: "9884455667".to_string(),
        service_type: ServiceType::Diagnostic,
        lead_type: LeadType::Camp,
        source_type: SourceType::CreditHealth,
        hospital_id: HospitalId::new(),
        hospital_name: "Lotus Diagnostics".to_string(),
        hospital_address: "4 Anna Salai".to_string(),
        city: "Chennai".to_string(),
        area: "Teynampet".to_string(),
        doctor_name: "Dr. Rao".to_string(),
        bd_name: "K. Vignesh".to_string(),
        procedure: "MRI".to_string(),
        bill_amount: dec!(5000),
        dci_charges: dec!(500),
        share_percent: dec!(25),
        patient_date: date(2026, 3, 5),
        remarks: Some("camp batch 7".to_string()),
    }
}

#[test]
fn derived_amounts_follow_edits() {
    let mut patient = Patient::create(new_patient(), None).unwrap();
    assert_eq!(patient.final_amount.amount(), dec!(4500));
    assert_eq!(patient.share_amount.amount(), dec!(1125));

    let mut edit = new_patient();
    edit.bill_amount = dec!(6000);
    edit.dci_charges = dec!(0);
    edit.share_percent = dec!(10);
    patient.apply(edit).unwrap();

    assert_eq!(patient.final_amount.amount(), dec!(6000));
    assert_eq!(patient.share_amount.amount(), dec!(600));
}

#[test]
fn wire_labels_match_original_shapes() {
    let patient = Patient::create(new_patient(), None).unwrap();
    let json = serde_json::to_value(&patient).unwrap();

    assert_eq!(json["serviceType"], "Diagnostic");
    assert_eq!(json["sourceType"], "Credit Health");
    assert_eq!(json["leadType"], "Camp");
    assert_eq!(json["invoiceStatus"], "To Be Raised");
    // Decimal amounts serialize as exact strings, never floats.
    assert_eq!(json["billAmount"], "5000");
}

#[test]
fn status_labels() {
    assert_eq!(PatientInvoiceStatus::ToBeRaised.as_str(), "To Be Raised");
    assert_eq!(PatientInvoiceStatus::InvoiceRaised.as_str(), "Invoice Raised");
    assert_eq!(PatientInvoiceStatus::NoShare.as_str(), "No Share");
}

#[test]
fn release_requires_commitment() {
    let mut patient = Patient::create(new_patient(), None).unwrap();
    assert!(patient.release_from_invoice().is_err());
}
