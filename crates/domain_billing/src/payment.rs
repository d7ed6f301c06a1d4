//! Payment ledger lines
//!
//! A payment line is one entry in an invoice's payment history: a cash
//! payment, a TDS certificate amount, an adjustment, or any mix of the
//! three. Lines are appended or replaced in place by id; they are never
//! arbitrarily deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PaymentLineId, Rate};

/// One entry in an invoice's payment ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLine {
    pub id: PaymentLineId,
    pub payment_date: NaiveDate,
    /// Cash amount received
    pub paid_amount: Money,
    /// TDS rate noted on the certificate, kept for reporting
    pub tds_percent: Rate,
    /// Withheld tax counted as received though not cash-paid
    pub tds_amount: Money,
    /// Mutually agreed write-off/adjustment counted as received
    pub adjustment_amount: Money,
    #[serde(default)]
    pub remarks: String,
}

impl PaymentLine {
    /// Creates a payment line with a fresh id
    pub fn new(
        payment_date: NaiveDate,
        paid_amount: Money,
        tds_percent: Rate,
        tds_amount: Money,
        adjustment_amount: Money,
        remarks: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentLineId::new(),
            payment_date,
            paid_amount,
            tds_percent,
            tds_amount,
            adjustment_amount,
            remarks: remarks.into(),
        }
    }

    /// True when the line carries neither cash nor adjustment
    ///
    /// Such lines are rejected on append; they are only meaningful as an
    /// in-place edit of an existing entry.
    pub fn is_zero_value(&self) -> bool {
        self.paid_amount.is_zero() && self.adjustment_amount.is_zero()
    }

    /// Everything this line counts toward the received total
    pub fn received(&self) -> Money {
        self.paid_amount + self.tds_amount + self.adjustment_amount
    }
}
