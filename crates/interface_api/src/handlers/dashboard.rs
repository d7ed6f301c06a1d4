//! Dashboard statistics handler

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use domain_access::pages;
use domain_billing::{DashboardStats, StatsFilter};
use infra_db::{InvoiceRepository, PatientRepository};

use crate::auth::Claims;
use crate::dto::dashboard::StatsQuery;
use crate::error::ApiError;
use crate::handlers::require_view;
use crate::AppState;

/// Computes dashboard totals and breakdowns over the filtered set
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<DashboardStats>, ApiError> {
    require_view(&claims, pages::DASHBOARD)?;

    let invoices = InvoiceRepository::new(state.pool.clone()).list().await?;
    let patients = PatientRepository::new(state.pool.clone()).list().await?;

    let filter = StatsFilter::from(query);
    Ok(Json(DashboardStats::compute(&invoices, &patients, &filter)))
}
