//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::AppState;

/// Extracts the bearer token, if the header carries one
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authentication middleware
///
/// Validates the bearer token and stashes its claims, permission grid
/// included, in request extensions for the page gate.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(&request) else {
        warn!(path = request.uri().path(), "missing bearer token");
        return Err(ApiError::Unauthorized);
    };

    let claims = crate::auth::validate_token(token, &state.config.jwt_secret).map_err(|e| {
        warn!(path = request.uri().path(), error = %e, "rejected token");
        ApiError::Unauthorized
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Request audit trail
///
/// Every mutation of billing data is logged with the acting account, so
/// an invoice or payment edit can be traced back to a person. Reads are
/// kept at debug.
pub async fn audit_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let is_mutation =
        method != Method::GET && method != Method::HEAD && method != Method::OPTIONS;

    let (actor, role) = match request.extensions().get::<Claims>() {
        Some(claims) => (claims.email.clone(), claims.role.clone()),
        None => ("anonymous".to_string(), String::new()),
    };

    let started = Instant::now();
    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if is_mutation {
        info!(%method, path, actor, role, status, elapsed_ms, "billing mutation");
    } else {
        debug!(%method, path, actor, role, status, elapsed_ms, "billing read");
    }

    response
}
