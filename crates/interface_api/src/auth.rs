//! Authentication and authorization
//!
//! JWT tokens carry the user's permission grid so the gate can run
//! without a database round trip. Tokens are invalidated only by
//! expiry; permission edits take effect at the next login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain_access::{PagePermission, PermissionSet, Role, User};

/// Bcrypt cost factor for password hashing
const BCRYPT_COST: u32 = 10;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Display name
    pub name: String,
    /// Account role label
    pub role: String,
    /// True for the administrative role that bypasses the page gate
    pub is_website_head: bool,
    /// Page permission grid at login time
    pub permissions: Vec<PagePermission>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// The permission set these claims check against
    pub fn permission_set(&self) -> PermissionSet {
        if self.is_website_head {
            PermissionSet::all()
        } else {
            PermissionSet::of(self.permissions.clone())
        }
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Creates a JWT for an authenticated user
pub fn create_token(
    user: &User,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role.as_str().to_string(),
        is_website_head: user.role == Role::WebsiteHead,
        permissions: user.permissions.clone(),
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}

/// Hashes a password for storage
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|_| AuthError::InvalidCredentials)
}

/// Verifies a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_access::NewUser;

    fn user() -> User {
        let mut user = User::signup(
            &NewUser {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                password: "secret1".to_string(),
                department: None,
            },
            "hash".to_string(),
        )
        .unwrap();
        user.set_permissions(vec![PagePermission::view("hospitals")]);
        user
    }

    #[test]
    fn test_token_round_trip_carries_permissions() {
        let token = create_token(&user(), "test-secret", 3600).unwrap();
        let claims = validate_token(&token, "test-secret").unwrap();

        assert_eq!(claims.email, "asha@example.com");
        assert!(!claims.is_website_head);
        assert!(claims.permission_set().can_view("hospitals"));
        assert!(!claims.permission_set().can_edit("hospitals"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(&user(), "test-secret", 3600).unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("wrong", &hash));
    }
}
