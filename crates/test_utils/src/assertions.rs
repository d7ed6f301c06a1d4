//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types that give more
//! meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_billing::Invoice;
use rust_decimal::Decimal;

/// Asserts that a Money value carries exactly the given amount
pub fn assert_money_eq(actual: Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Money mismatch: actual={}, expected={}",
        actual.amount(),
        expected
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money.amount());
}

/// Asserts that money values sum to a total
pub fn assert_sums_to(parts: &[Money], total: Money) {
    let sum: Money = parts.iter().copied().sum();
    assert_eq!(
        sum,
        total,
        "Sum mismatch: parts sum to {}, expected {}",
        sum.amount(),
        total.amount()
    );
}

/// Asserts the invariants every consistent invoice satisfies
///
/// The balance is non-negative, at most one of short/excess is nonzero,
/// and the balance equals the short amount whenever nothing clamps.
pub fn assert_invoice_consistent(invoice: &Invoice) {
    assert!(
        !invoice.balance_amount.is_negative(),
        "Balance went negative: {}",
        invoice.balance_amount.amount()
    );
    assert!(
        invoice.short_amount.is_zero() || invoice.excess_amount.is_zero(),
        "Short {} and excess {} are both nonzero",
        invoice.short_amount.amount(),
        invoice.excess_amount.amount()
    );
    assert_eq!(
        invoice.balance_amount, invoice.short_amount,
        "Balance {} diverged from short amount {}",
        invoice.balance_amount.amount(),
        invoice.short_amount.amount()
    );
}
