//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

use crate::error::AccessError;
use crate::permissions::{PagePermission, PermissionSet};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Account role
///
/// `WebsiteHead` is the administrative role: it bypasses the page
/// permission gate and is the only role allowed to manage accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "website_head")]
    WebsiteHead,
}

impl Role {
    /// Canonical label used in API payloads and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::WebsiteHead => "website_head",
        }
    }
}

/// Account lifecycle state
///
/// New signups land in `Pending` and cannot log in until an
/// administrator moves them to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "inactive")]
    Inactive,
}

impl AccountStatus {
    /// Canonical label used in API payloads and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

/// Input for a signup request
///
/// The web client sends the display name as `fullName`; when it is
/// absent entirely the email's local part stands in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(alias = "fullName", default)]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub department: Option<String>,
}

/// A user account
///
/// The password hash never leaves the server; it is skipped on
/// serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Stored lowercased and trimmed; lookups normalize the same way
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub permissions: Vec<PagePermission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalizes an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Creates a pending account from a validated signup
    ///
    /// The caller hashes the password; this constructor only checks the
    /// plaintext length before accepting the hash. A blank name falls
    /// back to the email's local part.
    pub fn signup(input: &NewUser, password_hash: String) -> Result<Self, AccessError> {
        let email = normalize_email(&input.email);
        if email.is_empty() {
            return Err(AccessError::MissingEmail);
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AccessError::PasswordTooShort(MIN_PASSWORD_LEN));
        }

        let name = match input.name.trim() {
            "" => email.split('@').next().unwrap_or(&email).to_string(),
            trimmed => trimmed.to_string(),
        };

        let now = Utc::now();
        Ok(Self {
            id: UserId::new_ordered(),
            name,
            email,
            department: input.department.clone(),
            password_hash,
            role: Role::User,
            status: AccountStatus::Pending,
            permissions: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates an active administrator account, used for bootstrap
    pub fn admin(name: impl Into<String>, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new_ordered(),
            name: name.into(),
            email: normalize_email(email),
            department: None,
            password_hash,
            role: Role::WebsiteHead,
            status: AccountStatus::Active,
            permissions: PermissionSet::full_grid(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the account may log in
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// The permission set this account checks against
    pub fn permission_set(&self) -> PermissionSet {
        if self.role == Role::WebsiteHead {
            PermissionSet::all()
        } else {
            PermissionSet::of(self.permissions.clone())
        }
    }

    /// Changes the account status
    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Changes the account role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Replaces the permission list
    pub fn set_permissions(&mut self, permissions: Vec<PagePermission>) {
        self.permissions = permissions;
        self.updated_at = Utc::now();
    }

    /// Replaces the stored password hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_input() -> NewUser {
        NewUser {
            name: "Asha Rao".to_string(),
            email: "  Asha.Rao@Example.COM ".to_string(),
            password: "secret1".to_string(),
            department: Some("Billing".to_string()),
        }
    }

    #[test]
    fn test_signup_normalizes_email_and_starts_pending() {
        let user = User::signup(&signup_input(), "hash".to_string()).unwrap();

        assert_eq!(user.email, "asha.rao@example.com");
        assert_eq!(user.status, AccountStatus::Pending);
        assert_eq!(user.role, Role::User);
        assert!(user.permissions.is_empty());
        assert!(!user.is_active());
    }

    #[test]
    fn test_signup_body_accepts_full_name_key() {
        let input: NewUser = serde_json::from_value(serde_json::json!({
            "email": "priya@example.com",
            "password": "secret1",
            "fullName": "Priya Nair",
            "department": "Accounts",
        }))
        .unwrap();

        assert_eq!(input.name, "Priya Nair");
        assert_eq!(input.department.as_deref(), Some("Accounts"));
    }

    #[test]
    fn test_blank_name_falls_back_to_email_prefix() {
        let input: NewUser = serde_json::from_value(serde_json::json!({
            "email": "Priya.N@Example.com",
            "password": "secret1",
        }))
        .unwrap();

        let user = User::signup(&input, "hash".to_string()).unwrap();
        assert_eq!(user.name, "priya.n");
    }

    #[test]
    fn test_signup_rejects_short_password() {
        let mut input = signup_input();
        input.password = "short".to_string();
        assert!(matches!(
            User::signup(&input, "hash".to_string()),
            Err(AccessError::PasswordTooShort(_))
        ));
    }

    #[test]
    fn test_website_head_bypasses_permission_list() {
        let mut user = User::signup(&signup_input(), "hash".to_string()).unwrap();
        assert!(!user.permission_set().can_view("hospitals"));

        user.set_role(Role::WebsiteHead);
        assert!(user.permission_set().can_edit("hospitals"));
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::signup(&signup_input(), "hash".to_string()).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "user");
        assert_eq!(json["status"], "pending");
    }
}
