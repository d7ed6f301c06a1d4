//! Patient handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::str::FromStr;

use core_kernel::{HospitalId, PatientId, UserId};
use domain_access::pages;
use domain_patient::{NewPatient, Patient};
use infra_db::PatientRepository;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::handlers::{require_edit, require_view};
use crate::AppState;

fn repo(state: &AppState) -> PatientRepository {
    PatientRepository::new(state.pool.clone())
}

/// Lists every patient, newest visit first
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    require_view(&claims, pages::PATIENTS)?;

    let patients = repo(&state).list().await?;
    Ok(Json(patients))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleQuery {
    pub hospital_id: HospitalId,
}

/// Lists patients eligible for invoicing at a hospital
pub async fn list_eligible(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<EligibleQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    require_view(&claims, pages::PATIENTS)?;

    let patients = repo(&state).list_eligible(query.hospital_id).await?;
    Ok(Json(patients))
}

/// Gets one patient
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<PatientId>,
) -> Result<Json<Patient>, ApiError> {
    require_view(&claims, pages::PATIENTS)?;

    let patient = repo(&state)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Patient not found".to_string()))?;
    Ok(Json(patient))
}

/// Creates a patient record
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<NewPatient>,
) -> Result<Json<Patient>, ApiError> {
    require_edit(&claims, pages::PATIENTS)?;

    let created_by = UserId::from_str(&claims.sub).ok();
    let patient = Patient::create(request, created_by)?;
    repo(&state).create(&patient).await?;
    Ok(Json(patient))
}

/// Replaces a patient's editable fields
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<PatientId>,
    Json(request): Json<NewPatient>,
) -> Result<Json<Patient>, ApiError> {
    require_edit(&claims, pages::PATIENTS)?;

    let repo = repo(&state);
    let mut patient = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Patient not found".to_string()))?;

    patient.apply(request)?;
    repo.update(&patient).await?;
    Ok(Json(patient))
}

/// Deletes a patient record not committed to an invoice
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<PatientId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_edit(&claims, pages::PATIENTS)?;

    repo(&state).delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "Patient deleted" })))
}
