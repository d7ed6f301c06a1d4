//! Liveness and readiness handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness report: proves the billing schema is reachable and shows
/// pool pressure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub migrations_applied: i64,
    pub pool_size: u32,
    pub pool_idle: usize,
}

/// Liveness probe; answers as long as the process runs
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe
///
/// Counts applied migrations, which both exercises the connection and
/// confirms the billing schema exists; a bare ping would pass against an
/// empty database.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    let (migrations_applied,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
            .fetch_one(&state.pool)
            .await
            .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    if migrations_applied == 0 {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(ReadinessResponse {
        status: "ready",
        version: env!("CARGO_PKG_VERSION"),
        migrations_applied,
        pool_size: state.pool.size(),
        pool_idle: state.pool.num_idle(),
    }))
}
