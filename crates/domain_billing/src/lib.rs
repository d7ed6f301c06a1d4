//! Billing domain
//!
//! Invoices bundle snapshots of eligible patient visits for one hospital
//! and accumulate payment lines against the invoiced total. The module
//! keeps every aggregate (paid, TDS, adjusted, balance, short/excess) and
//! the invoice status derivable from the payment list: replaying the same
//! list always yields the same aggregates.

pub mod error;
pub mod invoice;
pub mod ledger;
pub mod numbering;
pub mod payment;
pub mod reporting;

pub use error::BillingError;
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus};
pub use ledger::{short_excess, LedgerTotals, ShortExcess};
pub use numbering::next_invoice_number;
pub use payment::PaymentLine;
pub use reporting::{DashboardStats, StatsFilter};
