//! Auth DTOs

use serde::{Deserialize, Serialize};

use domain_access::User;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Signup acknowledgement; the account stays pending until approved
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: User,
}
