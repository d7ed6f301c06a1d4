//! Account administration DTOs

use serde::Deserialize;

use domain_access::{AccountStatus, PagePermission, Role};

/// Partial update of a user account; absent fields are left unchanged
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub permissions: Option<Vec<PagePermission>>,
    /// Plaintext replacement password, hashed before storage
    #[serde(default)]
    pub password: Option<String>,
}
