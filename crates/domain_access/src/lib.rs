//! Access domain
//!
//! User accounts with a flat page-permission model: every account holds a
//! list of per-page view/edit flags, checked by exact page name with no
//! wildcard or hierarchy semantics. The `website_head` role bypasses the
//! list entirely.

pub mod error;
pub mod permissions;
pub mod user;

pub use error::AccessError;
pub use permissions::{pages, PagePermission, PermissionSet};
pub use user::{normalize_email, AccountStatus, NewUser, Role, User};
