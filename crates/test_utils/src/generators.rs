//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{Money, Rate};
use domain_billing::PaymentLine;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for non-negative rupee amounts with two decimal places
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

/// Strategy for strictly positive rupee amounts
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

/// Strategy for non-negative Money values
pub fn money_strategy() -> impl Strategy<Value = Money> {
    amount_strategy().prop_map(Money::new)
}

/// Strategy for strictly positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_strategy().prop_map(Money::new)
}

/// Strategy for share percentages (0% to 100%, two decimal places)
pub fn share_percent_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for dates within 2026
pub fn date_2026_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(days)
    })
}

/// Strategy for payment lines carrying at least some value
///
/// At least one of paid and adjustment is nonzero, so generated lines
/// always pass the zero-value append check.
pub fn payment_line_strategy() -> impl Strategy<Value = PaymentLine> {
    (
        date_2026_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
    )
        .prop_filter_map(
            "line must carry cash or adjustment",
            |(date, paid, tds, adjustment)| {
                if paid.is_zero() && adjustment.is_zero() {
                    return None;
                }
                Some(PaymentLine::new(
                    date,
                    Money::new(paid),
                    Rate::ZERO,
                    Money::new(tds),
                    Money::new(adjustment),
                    "",
                ))
            },
        )
}

/// Strategy for a payment history of up to `max_lines` entries
pub fn payment_history_strategy(max_lines: usize) -> impl Strategy<Value = Vec<PaymentLine>> {
    proptest::collection::vec(payment_line_strategy(), 0..=max_lines)
}
