//! Flat page-permission model
//!
//! Permissions are a plain list of per-page view/edit flags. Lookups are
//! by exact page name; an absent page means no access. There is no
//! wildcard, inheritance, or implication between view and edit.

use serde::{Deserialize, Serialize};

/// Canonical page names checked by the permission gate
pub mod pages {
    pub const DASHBOARD: &str = "dashboard";
    pub const HOSPITALS: &str = "hospitals";
    pub const PATIENTS: &str = "patients";
    pub const INVOICES: &str = "invoices";
    pub const CREDENTIALS: &str = "credentials";
}

/// View/edit flags for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePermission {
    pub page_name: String,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_edit: bool,
}

impl PagePermission {
    /// Creates a permission entry for a page
    pub fn new(page_name: impl Into<String>, can_view: bool, can_edit: bool) -> Self {
        Self {
            page_name: page_name.into(),
            can_view,
            can_edit,
        }
    }

    /// View-only access to a page
    pub fn view(page_name: impl Into<String>) -> Self {
        Self::new(page_name, true, false)
    }

    /// Full access to a page
    pub fn full(page_name: impl Into<String>) -> Self {
        Self::new(page_name, true, true)
    }
}

/// A user's permission list together with the bypass flag
///
/// `bypass` is true for the `website_head` role, which short-circuits
/// every check to allow.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    pub bypass: bool,
    pub entries: Vec<PagePermission>,
}

impl PermissionSet {
    /// A set that allows everything
    pub fn all() -> Self {
        Self {
            bypass: true,
            entries: Vec::new(),
        }
    }

    /// A set over the given entries with no bypass
    pub fn of(entries: Vec<PagePermission>) -> Self {
        Self {
            bypass: false,
            entries,
        }
    }

    fn lookup(&self, page_name: &str) -> Option<&PagePermission> {
        self.entries.iter().find(|entry| entry.page_name == page_name)
    }

    /// True if the page may be viewed
    pub fn can_view(&self, page_name: &str) -> bool {
        if self.bypass {
            return true;
        }
        self.lookup(page_name).map_or(false, |entry| entry.can_view)
    }

    /// True if the page may be edited
    pub fn can_edit(&self, page_name: &str) -> bool {
        if self.bypass {
            return true;
        }
        self.lookup(page_name).map_or(false, |entry| entry.can_edit)
    }

    /// Full permission grid over every known page
    pub fn full_grid() -> Vec<PagePermission> {
        [
            pages::DASHBOARD,
            pages::HOSPITALS,
            pages::PATIENTS,
            pages::INVOICES,
            pages::CREDENTIALS,
        ]
        .into_iter()
        .map(PagePermission::full)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_allows_unlisted_pages() {
        let set = PermissionSet::all();
        assert!(set.can_view("anything"));
        assert!(set.can_edit("anything"));
    }

    #[test]
    fn test_exact_lookup_no_implication() {
        let set = PermissionSet::of(vec![
            PagePermission::view(pages::HOSPITALS),
            PagePermission::full(pages::PATIENTS),
        ]);

        assert!(set.can_view(pages::HOSPITALS));
        assert!(!set.can_edit(pages::HOSPITALS));
        assert!(set.can_edit(pages::PATIENTS));
    }

    #[test]
    fn test_absent_page_defaults_to_denied() {
        let set = PermissionSet::of(vec![PagePermission::full(pages::INVOICES)]);
        assert!(!set.can_view(pages::DASHBOARD));
        assert!(!set.can_edit(pages::DASHBOARD));
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let json = serde_json::to_value(PagePermission::view("hospitals")).unwrap();
        assert_eq!(json["pageName"], "hospitals");
        assert_eq!(json["canView"], true);
        assert_eq!(json["canEdit"], false);
    }
}
