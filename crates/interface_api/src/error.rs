//! API error handling
//!
//! Every error surfaces as `{"error": "<message>"}` with the matching
//! HTTP status, the wire shape clients already parse.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::CoreError;
use domain_access::AccessError;
use domain_billing::BillingError;
use domain_hospital::HospitalError;
use domain_patient::PatientError;
use infra_db::DatabaseError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match &err {
            DatabaseError::NotFound(msg) => ApiError::NotFound(msg.clone()),
            DatabaseError::DuplicateEntry(msg) => ApiError::Conflict(msg.clone()),
            DatabaseError::ConstraintViolation(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<HospitalError> for ApiError {
    fn from(err: HospitalError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::NotFound(msg) => ApiError::NotFound(msg.clone()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}
