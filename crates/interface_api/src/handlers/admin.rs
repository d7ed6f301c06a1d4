//! Account administration handlers
//!
//! Restricted to the website head; covers approval of pending signups,
//! role and permission grants, and password resets.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::str::FromStr;
use tracing::info;

use core_kernel::UserId;
use domain_access::User;
use infra_db::UserRepository;

use crate::auth::{self, Claims};
use crate::dto::admin::UserPatch;
use crate::error::ApiError;
use crate::handlers::require_website_head;
use crate::AppState;

fn repo(state: &AppState) -> UserRepository {
    UserRepository::new(state.pool.clone())
}

/// Lists every account
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<User>>, ApiError> {
    require_website_head(&claims)?;

    let users = repo(&state).list().await?;
    Ok(Json(users))
}

/// Patches an account: status, role, permission grid, or password
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<UserId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    require_website_head(&claims)?;

    let repo = repo(&state);
    let mut user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(department) = patch.department {
        user.department = Some(department);
    }
    if let Some(status) = patch.status {
        user.set_status(status);
    }
    if let Some(role) = patch.role {
        user.set_role(role);
    }
    if let Some(permissions) = patch.permissions {
        user.set_permissions(permissions);
    }
    if let Some(password) = patch.password {
        let hash = auth::hash_password(&password)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        user.set_password_hash(hash);
    }

    repo.update(&user).await?;
    info!(email = %user.email, "account updated");
    Ok(Json(user))
}

/// Deletes an account; the caller cannot delete their own
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<UserId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_website_head(&claims)?;

    if UserId::from_str(&claims.sub).ok() == Some(id) {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    repo(&state).delete(id).await?;
    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}
