//! Hospital status resolution tests

use chrono::{Days, NaiveDate};

use core_kernel::AgreementWindow;
use domain_hospital::{HospitalStatus, EXPIRY_WARNING_DAYS};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn window(start: NaiveDate, end: NaiveDate) -> AgreementWindow {
    AgreementWindow::new(Some(start), Some(end)).unwrap()
}

#[test]
fn manual_inactive_overrides_all_date_logic() {
    let today = date(2026, 8, 23);

    // Even a fully in-force agreement reads Inactive under the flag.
    let in_force = window(date(2026, 1, 1), date(2027, 12, 31));
    assert_eq!(
        HospitalStatus::resolve(true, &in_force, today),
        HospitalStatus::Inactive
    );

    // Same for an expired one, and for no agreement at all.
    let expired = window(date(2024, 1, 1), date(2025, 1, 1));
    assert_eq!(
        HospitalStatus::resolve(true, &expired, today),
        HospitalStatus::Inactive
    );
    assert_eq!(
        HospitalStatus::resolve(true, &AgreementWindow::open(), today),
        HospitalStatus::Inactive
    );
}

#[test]
fn missing_dates_mean_active() {
    let today = date(2026, 8, 23);

    assert_eq!(
        HospitalStatus::resolve(false, &AgreementWindow::open(), today),
        HospitalStatus::Active
    );

    let start_only = AgreementWindow::new(Some(date(2026, 1, 1)), None).unwrap();
    assert_eq!(
        HospitalStatus::resolve(false, &start_only, today),
        HospitalStatus::Active
    );

    let end_only = AgreementWindow::new(None, Some(date(2026, 1, 1))).unwrap();
    assert_eq!(
        HospitalStatus::resolve(false, &end_only, today),
        HospitalStatus::Active
    );
}

#[test]
fn agreement_not_yet_effective_is_active() {
    let today = date(2026, 8, 23);
    let future = window(date(2026, 9, 1), date(2026, 9, 15));

    // The end date is within the warning window but the agreement has
    // not started, so no expiry warning applies.
    assert_eq!(
        HospitalStatus::resolve(false, &future, today),
        HospitalStatus::Active
    );
}

#[test]
fn expiry_boundaries() {
    let today = date(2026, 8, 23);
    let start = date(2025, 1, 1);

    // Ended yesterday: Expired.
    let past = window(start, today.checked_sub_days(Days::new(1)).unwrap());
    assert_eq!(
        HospitalStatus::resolve(false, &past, today),
        HospitalStatus::Expired
    );

    // Ends today: day zero of the warning window.
    let today_end = window(start, today);
    assert_eq!(
        HospitalStatus::resolve(false, &today_end, today),
        HospitalStatus::ExpiredSoon
    );

    // Ends exactly at the warning horizon: still warned.
    let horizon = window(
        start,
        today
            .checked_add_days(Days::new(EXPIRY_WARNING_DAYS as u64))
            .unwrap(),
    );
    assert_eq!(
        HospitalStatus::resolve(false, &horizon, today),
        HospitalStatus::ExpiredSoon
    );

    // One day beyond the horizon: Active.
    let beyond = window(
        start,
        today
            .checked_add_days(Days::new(EXPIRY_WARNING_DAYS as u64 + 1))
            .unwrap(),
    );
    assert_eq!(
        HospitalStatus::resolve(false, &beyond, today),
        HospitalStatus::Active
    );
}

#[test]
fn ends_in_ten_days_reads_expired_soon() {
    let today = date(2026, 8, 23);
    let w = window(
        date(2026, 1, 1),
        today.checked_add_days(Days::new(10)).unwrap(),
    );

    assert_eq!(
        HospitalStatus::resolve(false, &w, today),
        HospitalStatus::ExpiredSoon
    );
}
