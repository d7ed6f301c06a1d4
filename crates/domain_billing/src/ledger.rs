//! Payment ledger accumulation and short/excess arithmetic

use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::payment::PaymentLine;

/// Sums of a payment list, folded in order
///
/// Recomputation is idempotent: folding the same list always yields the
/// same totals, so aggregates stored on the invoice are a pure function
/// of its payment lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub paid: Money,
    pub tds: Money,
    pub adjusted: Money,
}

impl LedgerTotals {
    /// Folds a payment list into its per-field sums
    pub fn of(payments: &[PaymentLine]) -> Self {
        payments.iter().fold(Self::default(), |mut acc, line| {
            acc.paid += line.paid_amount;
            acc.tds += line.tds_amount;
            acc.adjusted += line.adjustment_amount;
            acc
        })
    }

    /// Total counted as received: cash + TDS + adjustments
    pub fn received(&self) -> Money {
        self.paid + self.tds + self.adjusted
    }

    /// Outstanding balance against the invoiced total, floored at zero
    pub fn balance_against(&self, total: Money) -> Money {
        (total - self.received()).clamp_non_negative()
    }
}

/// Signed variance between received and invoiced amounts, split into a
/// shortfall and an overage
///
/// At most one side is nonzero; both are zero when received equals total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortExcess {
    pub short_amount: Money,
    pub excess_amount: Money,
}

/// Splits `received - total` into short and excess components
pub fn short_excess(total: Money, received: Money) -> ShortExcess {
    let difference = received - total;

    if difference.is_negative() {
        ShortExcess {
            short_amount: difference.abs(),
            excess_amount: Money::ZERO,
        }
    } else {
        ShortExcess {
            short_amount: Money::ZERO,
            excess_amount: difference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::Rate;
    use rust_decimal_macros::dec;

    fn money(d: rust_decimal::Decimal) -> Money {
        Money::new(d)
    }

    fn line(paid: rust_decimal::Decimal, tds: rust_decimal::Decimal, adj: rust_decimal::Decimal) -> PaymentLine {
        PaymentLine::new(
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            money(paid),
            Rate::ZERO,
            money(tds),
            money(adj),
            "",
        )
    }

    #[test]
    fn test_empty_ledger_starts_at_zero() {
        let totals = LedgerTotals::of(&[]);
        assert_eq!(totals, LedgerTotals::default());
        assert!(totals.received().is_zero());
        assert_eq!(ShortExcess::default().short_amount, Money::ZERO);
    }

    #[test]
    fn test_fold_sums_fields_independently() {
        let totals = LedgerTotals::of(&[
            line(dec!(500), dec!(50), dec!(0)),
            line(dec!(300), dec!(0), dec!(75)),
        ]);

        assert_eq!(totals.paid.amount(), dec!(800));
        assert_eq!(totals.tds.amount(), dec!(50));
        assert_eq!(totals.adjusted.amount(), dec!(75));
        assert_eq!(totals.received().amount(), dec!(925));
    }

    #[test]
    fn test_fold_is_idempotent() {
        let payments = vec![line(dec!(500), dec!(50), dec!(25)), line(dec!(100), dec!(0), dec!(0))];

        let first = LedgerTotals::of(&payments);
        let second = LedgerTotals::of(&payments);
        assert_eq!(first, second);
    }

    #[test]
    fn test_balance_floors_at_zero() {
        let totals = LedgerTotals::of(&[line(dec!(1200), dec!(0), dec!(0))]);
        assert_eq!(totals.balance_against(money(dec!(1000))), Money::ZERO);
    }

    #[test]
    fn test_short_excess_split() {
        let short = short_excess(money(dec!(1000)), money(dec!(800)));
        assert_eq!(short.short_amount.amount(), dec!(200));
        assert!(short.excess_amount.is_zero());

        let excess = short_excess(money(dec!(1000)), money(dec!(1150)));
        assert!(excess.short_amount.is_zero());
        assert_eq!(excess.excess_amount.amount(), dec!(150));

        let even = short_excess(money(dec!(1000)), money(dec!(1000)));
        assert!(even.short_amount.is_zero());
        assert!(even.excess_amount.is_zero());
    }
}
