//! Billing scenario tests
//!
//! End-to-end exercises of the invoice lifecycle against patient records,
//! plus property checks over arbitrary payment histories.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use domain_billing::{
    next_invoice_number, DashboardStats, Invoice, InvoiceItem, InvoiceStatus, StatsFilter,
};
use domain_patient::PatientInvoiceStatus;
use test_utils::{
    assert_invoice_consistent, payment_history_strategy, payment_line, HospitalBuilder,
    InvoiceBuilder, PatientBuilder, TemporalFixtures,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_invoice_lifecycle_from_patients_to_settlement() {
    let hospital = HospitalBuilder::new().build();

    let mut first = PatientBuilder::new()
        .with_hospital(hospital.id)
        .with_billing(dec!(5000), dec!(500), dec!(20))
        .build();
    let mut second = PatientBuilder::new()
        .with_hospital(hospital.id)
        .with_name("M. Lakshmi")
        .with_billing(dec!(2000), dec!(0), dec!(10))
        .build();

    // Shares: (5000-500)*20% = 900 and 2000*10% = 200.
    let invoice = Invoice::raise(
        next_invoice_number([], 2026),
        TemporalFixtures::invoice_date(),
        hospital.id,
        hospital.name.clone(),
        hospital.address.clone(),
        Some(hospital.city.clone()),
        Some(hospital.area.clone()),
        vec![
            InvoiceItem::from_patient(&first),
            InvoiceItem::from_patient(&second),
        ],
        None,
    )
    .unwrap();

    assert_eq!(invoice.invoice_number, "INV-2026-001");
    assert_eq!(invoice.total_amount.amount(), dec!(1100));
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);

    first
        .commit_to_invoice(&invoice.invoice_number, invoice.invoice_date)
        .unwrap();
    second
        .commit_to_invoice(&invoice.invoice_number, invoice.invoice_date)
        .unwrap();
    assert_eq!(first.invoice_status, PatientInvoiceStatus::InvoiceRaised);

    // Partial cash, then the remainder as TDS plus adjustment.
    let mut invoice = invoice;
    invoice
        .record_payment(payment_line(date(2026, 8, 20), dec!(900), dec!(0), dec!(0)))
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Unpaid);
    assert_eq!(invoice.balance_amount.amount(), dec!(200));
    assert_eq!(invoice.short_amount.amount(), dec!(200));

    invoice
        .record_payment(payment_line(date(2026, 9, 5), dec!(100), dec!(50), dec!(50)))
        .unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert!(invoice.balance_amount.is_zero());
    assert_invoice_consistent(&invoice);
}

#[test]
fn test_deleting_invoice_releases_patients() {
    let mut patient = PatientBuilder::new().build();
    patient.commit_to_invoice("INV-2026-007", date(2026, 8, 1)).unwrap();

    patient.release_from_invoice().unwrap();
    assert_eq!(patient.invoice_status, PatientInvoiceStatus::ToBeRaised);
    assert!(patient.invoice_number.is_none());
    assert!(patient.is_eligible_for_invoicing());
}

#[test]
fn test_numbering_follows_existing_invoices() {
    let hospital = HospitalBuilder::new().build();
    let numbers = ["INV-2026-001", "INV-2026-003"];

    let invoice = InvoiceBuilder::new()
        .with_hospital(hospital.id)
        .with_number(next_invoice_number(numbers, 2026))
        .with_share(dec!(500))
        .build();

    assert_eq!(invoice.invoice_number, "INV-2026-004");
}

#[test]
fn test_overpayment_shows_excess_with_zero_balance() {
    let mut invoice = InvoiceBuilder::new().with_share(dec!(1000)).build();
    invoice
        .record_payment(payment_line(date(2026, 8, 20), dec!(1150), dec!(0), dec!(0)))
        .unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert!(invoice.balance_amount.is_zero());
    assert_eq!(invoice.excess_amount.amount(), dec!(150));
    assert_invoice_consistent(&invoice);
}

#[test]
fn test_dashboard_excludes_frozen_invoices_from_totals() {
    let hospital = HospitalBuilder::new().build();

    let mut paid = InvoiceBuilder::new()
        .with_hospital(hospital.id)
        .with_number("INV-2026-001")
        .with_date(date(2026, 7, 1))
        .with_share(dec!(1000))
        .build();
    paid.record_payment(payment_line(date(2026, 7, 10), dec!(1000), dec!(0), dec!(0)))
        .unwrap();

    let open = InvoiceBuilder::new()
        .with_hospital(hospital.id)
        .with_number("INV-2026-002")
        .with_date(date(2026, 8, 1))
        .with_share(dec!(2000))
        .build();

    let mut cancelled = InvoiceBuilder::new()
        .with_hospital(hospital.id)
        .with_number("INV-2026-003")
        .with_date(date(2026, 8, 5))
        .with_share(dec!(5000))
        .build();
    cancelled.set_status(InvoiceStatus::Cancelled);

    let invoices = vec![paid, open, cancelled];
    let stats = DashboardStats::compute(&invoices, &[], &StatsFilter::default());

    assert_eq!(stats.total_invoices, 3);
    assert_eq!(stats.total_invoice_amount.amount(), dec!(3000));
    assert_eq!(stats.total_paid_amount.amount(), dec!(1000));
    assert_eq!(stats.total_unpaid_amount.amount(), dec!(2000));
    assert_eq!(stats.total_cancelled, 1);
    assert_eq!(stats.total_cancelled_amount.amount(), dec!(5000));
    assert_eq!(stats.paid_count, 1);
    assert_eq!(stats.unpaid_count, 1);

    // July and August slices carry their own invoice amounts.
    assert_eq!(stats.monthly_data[6].invoice_amount.amount(), dec!(1000));
    assert_eq!(stats.monthly_data[7].invoice_amount.amount(), dec!(2000));
}

#[test]
fn test_dashboard_patient_breakdowns() {
    let raised = PatientBuilder::new()
        .with_billing(dec!(1000), dec!(0), dec!(20))
        .build();
    let mut committed = PatientBuilder::new()
        .with_billing(dec!(2000), dec!(0), dec!(10))
        .build();
    committed
        .commit_to_invoice("INV-2026-001", date(2026, 8, 1))
        .unwrap();
    let no_share = PatientBuilder::new()
        .with_billing(dec!(3000), dec!(0), dec!(0))
        .build();

    let patients = vec![raised, committed, no_share];
    let stats = DashboardStats::compute(&[], &patients, &StatsFilter::default());

    assert_eq!(stats.patient_status_stats.to_be_raised.count, 1);
    assert_eq!(stats.patient_status_stats.to_be_raised.amount.amount(), dec!(200));
    assert_eq!(stats.patient_status_stats.invoice_raised.count, 1);
    assert_eq!(stats.patient_status_stats.invoice_raised.amount.amount(), dec!(200));
    assert_eq!(stats.patient_status_stats.no_share.count, 1);
    assert!(stats.patient_status_stats.no_share.amount.is_zero());

    // All builder patients are IP visits.
    assert_eq!(stats.service_type_stats.ip.count, 3);
    assert_eq!(stats.service_type_stats.op.count, 0);
}

#[test]
fn test_dashboard_filter_by_year() {
    let last_year = InvoiceBuilder::new()
        .with_number("INV-2025-001")
        .with_date(date(2025, 11, 1))
        .with_share(dec!(700))
        .build();
    let this_year = InvoiceBuilder::new()
        .with_number("INV-2026-001")
        .with_date(date(2026, 3, 1))
        .with_share(dec!(300))
        .build();

    let filter = StatsFilter {
        year: Some(2026),
        ..StatsFilter::default()
    };
    let stats = DashboardStats::compute(&[last_year, this_year], &[], &filter);

    assert_eq!(stats.total_invoices, 1);
    assert_eq!(stats.total_invoice_amount.amount(), dec!(300));
}

proptest! {
    /// Any payment history leaves the invoice internally consistent.
    #[test]
    fn prop_payment_history_keeps_invoice_consistent(
        payments in payment_history_strategy(8),
        share in 1i64..10_000_000i64,
    ) {
        let mut invoice = InvoiceBuilder::new()
            .with_share(rust_decimal::Decimal::new(share, 2))
            .build();

        for line in payments {
            invoice.record_payment(line).unwrap();
        }

        assert_invoice_consistent(&invoice);
    }

    /// Recalculation is idempotent over any payment history.
    #[test]
    fn prop_recalculate_is_idempotent(payments in payment_history_strategy(8)) {
        let mut invoice = InvoiceBuilder::new().with_share(dec!(1000)).build();
        for line in payments {
            invoice.record_payment(line).unwrap();
        }

        let before = (
            invoice.total_amount,
            invoice.paid_amount,
            invoice.tds_amount,
            invoice.adjusted_amount,
            invoice.balance_amount,
            invoice.short_amount,
            invoice.excess_amount,
            invoice.status,
        );
        invoice.recalculate();
        let after = (
            invoice.total_amount,
            invoice.paid_amount,
            invoice.tds_amount,
            invoice.adjusted_amount,
            invoice.balance_amount,
            invoice.short_amount,
            invoice.excess_amount,
            invoice.status,
        );
        prop_assert_eq!(before, after);
    }
}
