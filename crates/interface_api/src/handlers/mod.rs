//! Request handlers
//!
//! Each protected handler checks the caller's page permissions before
//! touching data; the flat gate lives on the claims extracted by the
//! auth middleware.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod hospitals;
pub mod invoices;
pub mod patients;

use crate::auth::Claims;
use crate::error::ApiError;

/// Rejects callers who may not view the given page
pub(crate) fn require_view(claims: &Claims, page: &str) -> Result<(), ApiError> {
    if claims.permission_set().can_view(page) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "You do not have permission to view {}",
            page
        )))
    }
}

/// Rejects callers who may not edit the given page
pub(crate) fn require_edit(claims: &Claims, page: &str) -> Result<(), ApiError> {
    if claims.permission_set().can_edit(page) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "You do not have permission to edit {}",
            page
        )))
    }
}

/// Rejects callers who are not the administrative role
pub(crate) fn require_website_head(claims: &Claims) -> Result<(), ApiError> {
    if claims.is_website_head {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the website head can manage accounts".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_access::{pages, PagePermission};

    fn claims(is_website_head: bool, permissions: Vec<PagePermission>) -> Claims {
        Claims {
            sub: "8b5c3f2e-0000-0000-0000-000000000001".to_string(),
            email: "staff@example.com".to_string(),
            name: "Staff".to_string(),
            role: "user".to_string(),
            is_website_head,
            permissions,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn view_only_grant_blocks_edits() {
        let claims = claims(false, vec![PagePermission::view(pages::PATIENTS)]);

        assert!(require_view(&claims, pages::PATIENTS).is_ok());
        assert!(require_edit(&claims, pages::PATIENTS).is_err());
    }

    #[test]
    fn ungranted_page_is_denied() {
        let claims = claims(false, vec![PagePermission::full(pages::PATIENTS)]);

        assert!(require_view(&claims, pages::INVOICES).is_err());
    }

    #[test]
    fn website_head_bypasses_the_grid() {
        let claims = claims(true, Vec::new());

        assert!(require_view(&claims, pages::DASHBOARD).is_ok());
        assert!(require_edit(&claims, pages::CREDENTIALS).is_ok());
        assert!(require_website_head(&claims).is_ok());
    }

    #[test]
    fn ordinary_user_cannot_manage_accounts() {
        let claims = claims(false, vec![PagePermission::full(pages::CREDENTIALS)]);

        assert!(require_website_head(&claims).is_err());
    }
}
