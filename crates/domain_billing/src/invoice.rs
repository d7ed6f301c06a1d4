//! Invoices: item snapshots, aggregates, and status resolution

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{HospitalId, InvoiceId, Money, PatientId, Rate, ServiceType, UserId};
use domain_patient::Patient;

use crate::error::BillingError;
use crate::ledger::{short_excess, LedgerTotals, ShortExcess};
use crate::payment::PaymentLine;

/// Display status of an invoice
///
/// `Cancelled` and `Hold` are sticky manual states: once set, only an
/// explicit status change leaves them. Every other value is derived from
/// the payment aggregates by [`InvoiceStatus::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Cancelled,
    #[serde(rename = "Amount Adjusted")]
    AmountAdjusted,
    Hold,
}

impl InvoiceStatus {
    /// Resolves an invoice's status from its aggregates
    ///
    /// Rules, in order: sticky `Cancelled`/`Hold` survive; an untouched
    /// ledger is `Unpaid`; full coverage is `Paid`; any nonzero
    /// adjustment on a partially covered invoice reads `Amount Adjusted`
    /// (even when most of the balance is a plain shortfall — downstream
    /// reporting relies on this, so it is preserved as-is); everything
    /// else is `Unpaid`.
    pub fn resolve(current: InvoiceStatus, total: Money, totals: &LedgerTotals) -> Self {
        match current {
            InvoiceStatus::Cancelled => return InvoiceStatus::Cancelled,
            InvoiceStatus::Hold => return InvoiceStatus::Hold,
            _ => {}
        }

        if totals.paid.is_zero() && totals.tds.is_zero() && totals.adjusted.is_zero() {
            return InvoiceStatus::Unpaid;
        }

        if totals.received() >= total {
            return InvoiceStatus::Paid;
        }

        if totals.adjusted.is_positive() {
            return InvoiceStatus::AmountAdjusted;
        }

        InvoiceStatus::Unpaid
    }

    /// Canonical label used in API payloads and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
            InvoiceStatus::AmountAdjusted => "Amount Adjusted",
            InvoiceStatus::Hold => "Hold",
        }
    }

    /// True for the sticky manual states excluded from balance reporting
    pub fn is_frozen(&self) -> bool {
        matches!(self, InvoiceStatus::Cancelled | InvoiceStatus::Hold)
    }
}

/// Snapshot of a patient's billing fields at commit time
///
/// The snapshot deliberately does not track later edits to the source
/// patient; the invoice reflects what was agreed when it was raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub patient_id: PatientId,
    pub patient_name: String,
    pub patient_date: NaiveDate,
    pub service_type: ServiceType,
    pub bill_amount: Money,
    pub dci_charges: Money,
    pub final_amount: Money,
    pub share_percent: Rate,
    pub share_amount: Money,
}

impl InvoiceItem {
    /// Snapshots the billing fields of a patient record
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            patient_id: patient.id,
            patient_name: patient.name.clone(),
            patient_date: patient.patient_date,
            service_type: patient.service_type,
            bill_amount: patient.bill_amount,
            dci_charges: patient.dci_charges,
            final_amount: patient.final_amount,
            share_percent: patient.share_percent,
            share_amount: patient.share_amount,
        }
    }
}

/// An invoice raised against a hospital for a set of patient visits
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub month: u32,
    pub year: i32,
    pub hospital_id: HospitalId,
    pub hospital_name: String,
    pub hospital_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_area: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub payments: Vec<PaymentLine>,
    /// Sum of item share amounts
    pub total_amount: Money,
    pub paid_amount: Money,
    pub tds_amount: Money,
    pub adjusted_amount: Money,
    /// `max(0, total - paid - tds - adjusted)`
    pub balance_amount: Money,
    pub short_amount: Money,
    pub excess_amount: Money,
    pub status: InvoiceStatus,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Raises a new invoice over snapshot items
    pub fn raise(
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        hospital_id: HospitalId,
        hospital_name: impl Into<String>,
        hospital_address: impl Into<String>,
        hospital_city: Option<String>,
        hospital_area: Option<String>,
        items: Vec<InvoiceItem>,
        created_by: Option<UserId>,
    ) -> Result<Self, BillingError> {
        if items.is_empty() {
            return Err(BillingError::EmptyInvoice);
        }

        let now = Utc::now();
        let mut invoice = Self {
            id: InvoiceId::new_ordered(),
            invoice_number: invoice_number.into(),
            invoice_date,
            month: invoice_date.month(),
            year: invoice_date.year(),
            hospital_id,
            hospital_name: hospital_name.into(),
            hospital_address: hospital_address.into(),
            hospital_city,
            hospital_area,
            items,
            payments: Vec::new(),
            total_amount: Money::ZERO,
            paid_amount: Money::ZERO,
            tds_amount: Money::ZERO,
            adjusted_amount: Money::ZERO,
            balance_amount: Money::ZERO,
            short_amount: Money::ZERO,
            excess_amount: Money::ZERO,
            status: InvoiceStatus::Unpaid,
            created_by,
            created_at: now,
            updated_at: now,
        };
        invoice.recalculate();
        Ok(invoice)
    }

    /// Patient ids of every item on the invoice
    pub fn patient_ids(&self) -> Vec<PatientId> {
        self.items.iter().map(|item| item.patient_id).collect()
    }

    /// Appends a payment line, or replaces the line with the same id
    ///
    /// A line carrying zero paid and zero adjustment is rejected unless
    /// it replaces an existing entry.
    pub fn record_payment(&mut self, line: PaymentLine) -> Result<(), BillingError> {
        match self.payments.iter_mut().find(|p| p.id == line.id) {
            Some(existing) => *existing = line,
            None => {
                if line.is_zero_value() {
                    return Err(BillingError::ZeroValuePayment);
                }
                self.payments.push(line);
            }
        }

        self.recalculate();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replaces the item list (invoice edit), re-deriving aggregates
    pub fn replace_items(&mut self, items: Vec<InvoiceItem>) -> Result<(), BillingError> {
        if items.is_empty() {
            return Err(BillingError::EmptyInvoice);
        }
        self.items = items;
        self.recalculate();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Removes a single patient's item from the invoice
    pub fn remove_item(&mut self, patient_id: PatientId) -> Result<(), BillingError> {
        let before = self.items.len();
        self.items.retain(|item| item.patient_id != patient_id);

        if self.items.len() == before {
            return Err(BillingError::ItemNotFound(patient_id.to_string()));
        }

        self.recalculate();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Applies a manual status change (Cancel / Hold / reopen)
    ///
    /// Non-sticky targets are immediately re-derived from the ledger, so
    /// setting `Paid` on an uncovered invoice falls back to the derived
    /// value.
    pub fn set_status(&mut self, status: InvoiceStatus) {
        self.status = status;
        self.recalculate();
        self.updated_at = Utc::now();
    }

    /// Changes the invoice date, keeping month/year in step
    pub fn set_invoice_date(&mut self, date: NaiveDate) {
        self.invoice_date = date;
        self.month = date.month();
        self.year = date.year();
        self.updated_at = Utc::now();
    }

    /// Re-derives every aggregate and the status from items and payments
    ///
    /// Idempotent: calling this any number of times over unchanged lists
    /// produces identical values.
    pub fn recalculate(&mut self) {
        self.total_amount = self.items.iter().map(|item| item.share_amount).sum();

        let totals = LedgerTotals::of(&self.payments);
        self.paid_amount = totals.paid;
        self.tds_amount = totals.tds;
        self.adjusted_amount = totals.adjusted;
        self.balance_amount = totals.balance_against(self.total_amount);

        let ShortExcess {
            short_amount,
            excess_amount,
        } = short_excess(self.total_amount, totals.received());
        self.short_amount = short_amount;
        self.excess_amount = excess_amount;

        self.status = InvoiceStatus::resolve(self.status, self.total_amount, &totals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Rate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(share: rust_decimal::Decimal) -> InvoiceItem {
        let bill = Money::new(share * dec!(5));
        InvoiceItem {
            patient_id: PatientId::new(),
            patient_name: "Test Patient".to_string(),
            patient_date: date(2026, 7, 1),
            service_type: ServiceType::Op,
            bill_amount: bill,
            dci_charges: Money::ZERO,
            final_amount: bill,
            share_percent: Rate::from_percentage(dec!(20)),
            share_amount: Money::new(share),
        }
    }

    fn invoice(shares: &[rust_decimal::Decimal]) -> Invoice {
        Invoice::raise(
            "INV-2026-001",
            date(2026, 8, 1),
            HospitalId::new(),
            "Apex Care",
            "12 Mount Road",
            Some("Chennai".to_string()),
            None,
            shares.iter().map(|s| item(*s)).collect(),
            None,
        )
        .unwrap()
    }

    fn line(paid: rust_decimal::Decimal, tds: rust_decimal::Decimal, adj: rust_decimal::Decimal) -> PaymentLine {
        PaymentLine::new(
            date(2026, 8, 10),
            Money::new(paid),
            Rate::ZERO,
            Money::new(tds),
            Money::new(adj),
            "",
        )
    }

    #[test]
    fn test_raise_requires_items() {
        let result = Invoice::raise(
            "INV-2026-001",
            date(2026, 8, 1),
            HospitalId::new(),
            "Apex Care",
            "12 Mount Road",
            None,
            None,
            Vec::new(),
            None,
        );
        assert!(matches!(result, Err(BillingError::EmptyInvoice)));
    }

    #[test]
    fn test_full_payment_reads_paid() {
        let mut inv = invoice(&[dec!(600), dec!(400)]);
        inv.record_payment(line(dec!(1000), dec!(0), dec!(0))).unwrap();

        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert!(inv.balance_amount.is_zero());
        assert!(inv.short_amount.is_zero());
        assert!(inv.excess_amount.is_zero());
    }

    #[test]
    fn test_partial_adjustment_reads_amount_adjusted() {
        let mut inv = invoice(&[dec!(1000)]);
        inv.record_payment(line(dec!(0), dec!(0), dec!(200))).unwrap();

        assert_eq!(inv.status, InvoiceStatus::AmountAdjusted);
        assert_eq!(inv.balance_amount.amount(), dec!(800));
        assert_eq!(inv.short_amount.amount(), dec!(800));
    }

    #[test]
    fn test_zero_value_append_rejected_but_edit_allowed() {
        let mut inv = invoice(&[dec!(1000)]);

        assert!(matches!(
            inv.record_payment(line(dec!(0), dec!(0), dec!(0))),
            Err(BillingError::ZeroValuePayment)
        ));

        // An existing line may be edited down to zero in place.
        let first = line(dec!(500), dec!(0), dec!(0));
        let id = first.id;
        inv.record_payment(first).unwrap();

        let mut edit = line(dec!(0), dec!(0), dec!(0));
        edit.id = id;
        inv.record_payment(edit).unwrap();

        assert_eq!(inv.payments.len(), 1);
        assert_eq!(inv.status, InvoiceStatus::Unpaid);
        assert_eq!(inv.balance_amount.amount(), dec!(1000));
    }

    #[test]
    fn test_cancelled_is_sticky_until_reopened() {
        let mut inv = invoice(&[dec!(1000)]);
        inv.set_status(InvoiceStatus::Cancelled);

        // Full payment does not unseat the manual state.
        inv.record_payment(line(dec!(1000), dec!(0), dec!(0))).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Cancelled);

        // Explicit reopen re-derives from the ledger.
        inv.set_status(InvoiceStatus::Unpaid);
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_manual_paid_is_rederived() {
        let mut inv = invoice(&[dec!(1000)]);
        inv.set_status(InvoiceStatus::Paid);
        assert_eq!(inv.status, InvoiceStatus::Unpaid);
    }

    #[test]
    fn test_remove_item_rederives_totals() {
        let mut inv = invoice(&[dec!(600), dec!(400)]);
        let gone = inv.items[1].patient_id;

        inv.remove_item(gone).unwrap();
        assert_eq!(inv.total_amount.amount(), dec!(600));
        assert!(matches!(
            inv.remove_item(gone),
            Err(BillingError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_status_wire_labels() {
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::AmountAdjusted).unwrap(),
            "\"Amount Adjusted\""
        );
        assert_eq!(serde_json::to_string(&InvoiceStatus::Hold).unwrap(), "\"Hold\"");
    }
}
