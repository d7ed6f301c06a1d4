//! Hospital handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use std::str::FromStr;

use core_kernel::{HospitalId, UserId};
use domain_access::pages;
use domain_hospital::{Hospital, NewHospital};
use infra_db::HospitalRepository;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::handlers::{require_edit, require_view};
use crate::AppState;

fn repo(state: &AppState) -> HospitalRepository {
    HospitalRepository::new(state.pool.clone())
}

fn acting_user(claims: &Claims) -> Option<UserId> {
    UserId::from_str(&claims.sub).ok()
}

/// Lists hospitals with statuses derived for today
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Hospital>>, ApiError> {
    require_view(&claims, pages::HOSPITALS)?;

    let hospitals = repo(&state).list(Utc::now().date_naive()).await?;
    Ok(Json(hospitals))
}

/// Gets one hospital
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<HospitalId>,
) -> Result<Json<Hospital>, ApiError> {
    require_view(&claims, pages::HOSPITALS)?;

    let hospital = repo(&state)
        .find_by_id(id, Utc::now().date_naive())
        .await?
        .ok_or_else(|| ApiError::NotFound("Hospital not found".to_string()))?;
    Ok(Json(hospital))
}

/// Creates a hospital
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<NewHospital>,
) -> Result<Json<Hospital>, ApiError> {
    require_edit(&claims, pages::HOSPITALS)?;

    let hospital = Hospital::create(request, acting_user(&claims), Utc::now().date_naive())?;
    repo(&state).create(&hospital).await?;
    Ok(Json(hospital))
}

/// Replaces a hospital's editable fields
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<HospitalId>,
    Json(request): Json<NewHospital>,
) -> Result<Json<Hospital>, ApiError> {
    require_edit(&claims, pages::HOSPITALS)?;

    let today = Utc::now().date_naive();
    let repo = repo(&state);
    let mut hospital = repo
        .find_by_id(id, today)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hospital not found".to_string()))?;

    hospital.apply(request, today)?;
    repo.update(&hospital).await?;
    Ok(Json(hospital))
}

/// Deletes a hospital
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<HospitalId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_edit(&claims, pages::HOSPITALS)?;

    repo(&state).delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "Hospital deleted" })))
}
