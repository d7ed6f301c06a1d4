//! Invoice handlers
//!
//! Raising, editing, and deleting invoices goes through the invoice
//! repository so the patient linkage flips in the same transaction.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::str::FromStr;

use core_kernel::{HospitalId, InvoiceId, Money, PatientId, Rate, UserId};
use domain_access::pages;
use domain_billing::{next_invoice_number, Invoice, InvoiceItem, PaymentLine};
use infra_db::{HospitalRepository, InvoiceRepository, PatientRepository};

use crate::auth::Claims;
use crate::dto::invoice::{
    CreateInvoiceRequest, NextNumberQuery, NextNumberResponse, PaymentRequest,
    UpdateInvoiceRequest,
};
use crate::error::ApiError;
use crate::handlers::{require_edit, require_view};
use crate::AppState;

fn repo(state: &AppState) -> InvoiceRepository {
    InvoiceRepository::new(state.pool.clone())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub hospital_id: Option<HospitalId>,
}

/// Lists invoices, optionally narrowed to one hospital
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Invoice>>, ApiError> {
    require_view(&claims, pages::INVOICES)?;

    let repo = repo(&state);
    let invoices = match query.hospital_id {
        Some(hospital_id) => repo.list_by_hospital(hospital_id).await?,
        None => repo.list().await?,
    };
    Ok(Json(invoices))
}

/// Gets one invoice
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<InvoiceId>,
) -> Result<Json<Invoice>, ApiError> {
    require_view(&claims, pages::INVOICES)?;

    let invoice = repo(&state)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;
    Ok(Json(invoice))
}

/// Previews the next invoice number for a year
pub async fn next_number(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<NextNumberQuery>,
) -> Result<Json<NextNumberResponse>, ApiError> {
    require_view(&claims, pages::INVOICES)?;

    let year = query.year.unwrap_or_else(|| Utc::now().date_naive().year());
    let numbers = repo(&state).numbers_for_year(year).await?;

    Ok(Json(NextNumberResponse {
        invoice_number: next_invoice_number(numbers.iter().map(String::as_str), year),
    }))
}

/// Raises an invoice over eligible patients
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<Invoice>, ApiError> {
    require_edit(&claims, pages::INVOICES)?;

    let hospital = HospitalRepository::new(state.pool.clone())
        .find_by_id(request.hospital_id, Utc::now().date_naive())
        .await?
        .ok_or_else(|| ApiError::NotFound("Hospital not found".to_string()))?;

    let items = load_items(&state, &request.patient_ids).await?;

    let auto_number = request.invoice_number.is_none();
    if let Some(number) = &request.invoice_number {
        if number.trim().is_empty() {
            return Err(ApiError::BadRequest("Invoice number cannot be blank".to_string()));
        }
    }

    let invoice = Invoice::raise(
        request.invoice_number.unwrap_or_default(),
        request.invoice_date,
        hospital.id,
        hospital.name.clone(),
        hospital.address.clone(),
        Some(hospital.city.clone()),
        Some(hospital.area.clone()),
        items,
        UserId::from_str(&claims.sub).ok(),
    )?;

    let invoice = repo(&state).create(invoice, auto_number).await?;
    Ok(Json(invoice))
}

/// Edits an invoice's date, item set, or status
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<InvoiceId>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<Invoice>, ApiError> {
    require_edit(&claims, pages::INVOICES)?;

    let repo = repo(&state);
    let mut invoice = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;

    let mut released: Vec<PatientId> = Vec::new();
    let mut added: Vec<PatientId> = Vec::new();

    if let Some(patient_ids) = &request.patient_ids {
        let current: HashSet<PatientId> = invoice.patient_ids().into_iter().collect();
        let requested: HashSet<PatientId> = patient_ids.iter().copied().collect();

        released = current.difference(&requested).copied().collect();
        added = requested.difference(&current).copied().collect();

        // Keep existing snapshots; only added patients are re-snapshotted.
        let mut items: Vec<InvoiceItem> = invoice
            .items
            .iter()
            .filter(|item| requested.contains(&item.patient_id))
            .cloned()
            .collect();
        items.extend(load_items(&state, &added).await?);
        invoice.replace_items(items)?;
    }

    if let Some(date) = request.invoice_date {
        invoice.set_invoice_date(date);
    }
    if let Some(status) = request.status {
        invoice.set_status(status);
    }

    repo.update(&invoice, &released, &added).await?;
    Ok(Json(invoice))
}

/// Records a payment line, or edits one in place
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<InvoiceId>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<Invoice>, ApiError> {
    require_edit(&claims, pages::INVOICES)?;

    let repo = repo(&state);
    let mut invoice = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".to_string()))?;

    let mut line = PaymentLine::new(
        request.payment_date,
        Money::new(request.paid_amount),
        Rate::from_percentage(request.tds_percent),
        Money::new(request.tds_amount),
        Money::new(request.adjustment_amount),
        request.remarks,
    );
    if let Some(line_id) = request.id {
        line.id = line_id;
    }

    invoice.record_payment(line)?;
    repo.save(&invoice).await?;
    Ok(Json(invoice))
}

/// Deletes an invoice, releasing its patients
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<InvoiceId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_edit(&claims, pages::INVOICES)?;

    repo(&state).delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "Invoice deleted" })))
}

/// Loads and snapshots the given patients, rejecting ineligible ones
async fn load_items(
    state: &AppState,
    patient_ids: &[PatientId],
) -> Result<Vec<InvoiceItem>, ApiError> {
    let patients = PatientRepository::new(state.pool.clone());

    let mut items = Vec::with_capacity(patient_ids.len());
    for id in patient_ids {
        let patient = patients
            .find_by_id(*id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Patient {} not found", id)))?;

        if !patient.is_eligible_for_invoicing() {
            return Err(ApiError::BadRequest(format!(
                "Patient {} is not eligible for invoicing",
                patient.name
            )));
        }
        items.push(InvoiceItem::from_patient(&patient));
    }
    Ok(items)
}
