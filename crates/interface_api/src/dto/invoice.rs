//! Invoice DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{HospitalId, PatientId, PaymentLineId};
use domain_billing::InvoiceStatus;

/// Request to raise a new invoice
///
/// `invoice_number` is optional: when absent the server allocates the
/// next number for the invoice date's year.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub invoice_number: Option<String>,
    pub invoice_date: NaiveDate,
    pub hospital_id: HospitalId,
    pub patient_ids: Vec<PatientId>,
}

/// Request to edit an existing invoice
///
/// Absent fields are left unchanged. Supplying `patient_ids` replaces
/// the item set, releasing dropped patients and committing added ones.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceRequest {
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub patient_ids: Option<Vec<PatientId>>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

/// Request to add a payment line, or edit one in place when `id` is set
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub id: Option<PaymentLineId>,
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub tds_percent: Decimal,
    #[serde(default)]
    pub tds_amount: Decimal,
    #[serde(default)]
    pub adjustment_amount: Decimal,
    #[serde(default)]
    pub remarks: String,
}

/// Query for previewing the next invoice number
#[derive(Debug, Deserialize)]
pub struct NextNumberQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

/// Next allocatable invoice number
///
/// A preview only; the durable allocation happens when the invoice is
/// raised.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextNumberResponse {
    pub invoice_number: String,
}
