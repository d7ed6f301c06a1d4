//! Account lifecycle and permission gate scenarios

use domain_access::{pages, AccountStatus, NewUser, PagePermission, Role, User};

fn signup(name: &str, email: &str) -> User {
    User::signup(
        &NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            department: None,
        },
        "bcrypt-hash".to_string(),
    )
    .unwrap()
}

#[test]
fn test_approval_flow_grants_access() {
    let mut user = signup("Asha Rao", "asha@example.com");
    assert!(!user.is_active());

    // Admin approves and grants a partial grid.
    user.set_status(AccountStatus::Active);
    user.set_permissions(vec![
        PagePermission::full(pages::PATIENTS),
        PagePermission::view(pages::INVOICES),
    ]);

    assert!(user.is_active());
    let set = user.permission_set();
    assert!(set.can_edit(pages::PATIENTS));
    assert!(set.can_view(pages::INVOICES));
    assert!(!set.can_edit(pages::INVOICES));
    assert!(!set.can_view(pages::HOSPITALS));
}

#[test]
fn test_website_head_needs_no_grid() {
    let mut user = signup("Head", "head@example.com");
    user.set_status(AccountStatus::Active);
    user.set_role(Role::WebsiteHead);

    let set = user.permission_set();
    assert!(set.can_view(pages::CREDENTIALS));
    assert!(set.can_edit(pages::HOSPITALS));
}

#[test]
fn test_deactivated_account_keeps_grid_but_not_access() {
    let mut user = signup("Asha Rao", "asha@example.com");
    user.set_status(AccountStatus::Active);
    user.set_permissions(vec![PagePermission::full(pages::PATIENTS)]);

    user.set_status(AccountStatus::Inactive);
    assert!(!user.is_active());
    // The grid itself is untouched; login gating happens on status.
    assert!(user.permission_set().can_edit(pages::PATIENTS));
}

#[test]
fn test_admin_bootstrap_account() {
    let admin = User::admin("Admin", "Admin@Example.com", "hash".to_string());
    assert_eq!(admin.email, "admin@example.com");
    assert_eq!(admin.role, Role::WebsiteHead);
    assert!(admin.is_active());
    assert!(!admin.permissions.is_empty());
}
