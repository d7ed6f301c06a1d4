//! Auth handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use std::str::FromStr;
use tracing::info;

use core_kernel::UserId;
use domain_access::{NewUser, User};
use infra_db::UserRepository;

use crate::auth::{self, Claims};
use crate::dto::auth::{AuthResponse, LoginRequest, SignupResponse};
use crate::error::ApiError;
use crate::AppState;

/// Registers a new account, which stays pending until approved
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let hash = auth::hash_password(&request.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let user = User::signup(&request, hash)?;

    let repo = UserRepository::new(state.pool.clone());
    repo.create(&user).await?;

    info!(email = %user.email, "new signup pending approval");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Account created. An administrator must approve it before you can log in."
                .to_string(),
            user,
        }),
    ))
}

/// Exchanges credentials for a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_email(&request.email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !auth::verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }
    if !user.is_active() {
        return Err(ApiError::Forbidden(
            "Account is not active. Contact an administrator.".to_string(),
        ));
    }

    let token = auth::create_token(&user, &state.config.jwt_secret, state.config.jwt_expiration_secs)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!(email = %user.email, "login");
    Ok(Json(AuthResponse { token, user }))
}

/// Returns the authenticated user's current account record
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ApiError> {
    let id = UserId::from_str(&claims.sub).map_err(|_| ApiError::Unauthorized)?;

    let repo = UserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
