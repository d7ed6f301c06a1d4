//! Dashboard reporting aggregates
//!
//! Pure fold over invoice and patient slices. Cancelled and Hold
//! invoices are excluded from the money totals (their amounts are
//! reported separately) but still counted in the overall invoice count.

use chrono::Datelike;
use serde::Serialize;

use core_kernel::{HospitalId, Money, ServiceType};
use domain_patient::{Patient, PatientInvoiceStatus};

use crate::invoice::{Invoice, InvoiceStatus};

/// Month labels for the monthly series
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Filters applied before aggregation
///
/// `month` only narrows when `year` is set, mirroring how the dashboard
/// filters combine. `appointment_month` matches on the patient dates
/// inside invoice items rather than the invoice date.
#[derive(Debug, Clone, Default)]
pub struct StatsFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub appointment_month: Option<u32>,
    pub hospital_id: Option<HospitalId>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub status: Option<InvoiceStatus>,
}

impl StatsFilter {
    fn matches_invoice(&self, invoice: &Invoice) -> bool {
        if let Some(year) = self.year {
            if invoice.year != year {
                return false;
            }
            if let Some(month) = self.month {
                if invoice.month != month {
                    return false;
                }
            }
            if let Some(appointment_month) = self.appointment_month {
                let any = invoice
                    .items
                    .iter()
                    .any(|item| item.patient_date.month() == appointment_month);
                if !any {
                    return false;
                }
            }
        }
        if let Some(hospital_id) = self.hospital_id {
            if invoice.hospital_id != hospital_id {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if invoice.hospital_city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }
        if let Some(area) = &self.area {
            if invoice.hospital_area.as_deref() != Some(area.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if invoice.status != status {
                return false;
            }
        }
        true
    }

    fn matches_patient(&self, patient: &Patient) -> bool {
        if let Some(year) = self.year {
            if patient.year != year {
                return false;
            }
        }
        if let Some(hospital_id) = self.hospital_id {
            if patient.hospital_id != hospital_id {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if &patient.city != city {
                return false;
            }
        }
        if let Some(area) = &self.area {
            if &patient.area != area {
                return false;
            }
        }
        if let Some(appointment_month) = self.appointment_month {
            if patient.month != appointment_month {
                return false;
            }
        }
        true
    }
}

/// Count and share-amount pair used by the breakdowns
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountAmount {
    pub count: usize,
    pub amount: Money,
}

impl CountAmount {
    fn add(&mut self, amount: Money) {
        self.count += 1;
        self.amount += amount;
    }
}

/// Per-service-line breakdown of patient share amounts
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeStats {
    pub op: CountAmount,
    pub ip: CountAmount,
    pub diagnostic: CountAmount,
}

/// Patient counts/amounts per invoicing state
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStatusStats {
    pub invoice_raised: CountAmount,
    pub to_be_raised: CountAmount,
    pub no_share: CountAmount,
}

/// One month of the dashboard chart series
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySlice {
    pub month: &'static str,
    pub month_num: u32,
    pub op: Money,
    pub ip: Money,
    pub diagnostic: Money,
    pub op_count: usize,
    pub ip_count: usize,
    pub diagnostic_count: usize,
    pub invoice_amount: Money,
    pub paid_amount: Money,
    pub unpaid_amount: Money,
    pub tds_amount: Money,
}

/// Aggregated dashboard figures
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_invoices: usize,
    pub total_invoice_amount: Money,
    pub total_paid_amount: Money,
    pub total_unpaid_amount: Money,
    pub total_cancelled: usize,
    pub total_cancelled_amount: Money,
    pub total_tds_amount: Money,
    pub total_adjustment_amount: Money,
    pub total_balance_amount: Money,
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub adjusted_count: usize,
    pub tds_count: usize,
    pub hold_count: usize,
    pub hold_amount: Money,
    pub short_total: Money,
    pub excess_total: Money,
    pub monthly_data: Vec<MonthlySlice>,
    pub service_type_stats: ServiceTypeStats,
    pub patient_status_stats: PatientStatusStats,
}

impl DashboardStats {
    /// Folds filtered invoices and patients into the dashboard figures
    pub fn compute(invoices: &[Invoice], patients: &[Patient], filter: &StatsFilter) -> Self {
        let filtered: Vec<&Invoice> = invoices
            .iter()
            .filter(|inv| filter.matches_invoice(inv))
            .collect();

        let active: Vec<&Invoice> = filtered
            .iter()
            .copied()
            .filter(|inv| !inv.status.is_frozen())
            .collect();
        let cancelled: Vec<&Invoice> = filtered
            .iter()
            .copied()
            .filter(|inv| inv.status == InvoiceStatus::Cancelled)
            .collect();
        let held: Vec<&Invoice> = filtered
            .iter()
            .copied()
            .filter(|inv| inv.status == InvoiceStatus::Hold)
            .collect();

        let total_invoice_amount: Money = active.iter().map(|inv| inv.total_amount).sum();
        let total_paid_amount: Money = active.iter().map(|inv| inv.paid_amount).sum();
        let total_tds_amount: Money = active.iter().map(|inv| inv.tds_amount).sum();
        let total_adjustment_amount: Money = active.iter().map(|inv| inv.adjusted_amount).sum();

        let total_unpaid_amount = (total_invoice_amount
            - total_paid_amount
            - total_tds_amount
            - total_adjustment_amount)
            .clamp_non_negative();

        let patients: Vec<&Patient> = patients
            .iter()
            .filter(|p| filter.matches_patient(p))
            .collect();

        let monthly_data = MONTH_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let month_num = idx as u32 + 1;
                let month_patients: Vec<&&Patient> =
                    patients.iter().filter(|p| p.month == month_num).collect();
                let month_invoices: Vec<&&Invoice> =
                    active.iter().filter(|inv| inv.month == month_num).collect();

                let by_service = |service: ServiceType| -> (usize, Money) {
                    let selected = month_patients
                        .iter()
                        .filter(|p| p.service_type == service);
                    let mut count = 0;
                    let mut amount = Money::ZERO;
                    for p in selected {
                        count += 1;
                        amount += p.share_amount;
                    }
                    (count, amount)
                };

                let (op_count, op) = by_service(ServiceType::Op);
                let (ip_count, ip) = by_service(ServiceType::Ip);
                let (diagnostic_count, diagnostic) = by_service(ServiceType::Diagnostic);

                MonthlySlice {
                    month: name,
                    month_num,
                    op,
                    ip,
                    diagnostic,
                    op_count,
                    ip_count,
                    diagnostic_count,
                    invoice_amount: month_invoices.iter().map(|inv| inv.total_amount).sum(),
                    paid_amount: month_invoices.iter().map(|inv| inv.paid_amount).sum(),
                    unpaid_amount: month_invoices.iter().map(|inv| inv.balance_amount).sum(),
                    tds_amount: month_invoices.iter().map(|inv| inv.tds_amount).sum(),
                }
            })
            .collect();

        let mut service_type_stats = ServiceTypeStats::default();
        let mut patient_status_stats = PatientStatusStats::default();
        for patient in &patients {
            match patient.service_type {
                ServiceType::Op => service_type_stats.op.add(patient.share_amount),
                ServiceType::Ip => service_type_stats.ip.add(patient.share_amount),
                ServiceType::Diagnostic => {
                    service_type_stats.diagnostic.add(patient.share_amount)
                }
            }
            match patient.invoice_status {
                PatientInvoiceStatus::InvoiceRaised => {
                    patient_status_stats.invoice_raised.add(patient.share_amount)
                }
                PatientInvoiceStatus::ToBeRaised => {
                    patient_status_stats.to_be_raised.add(patient.share_amount)
                }
                PatientInvoiceStatus::NoShare => {
                    patient_status_stats.no_share.add(patient.share_amount)
                }
            }
        }

        Self {
            total_invoices: filtered.len(),
            total_invoice_amount,
            total_paid_amount,
            total_unpaid_amount,
            total_cancelled: cancelled.len(),
            total_cancelled_amount: cancelled.iter().map(|inv| inv.total_amount).sum(),
            total_tds_amount,
            total_adjustment_amount,
            total_balance_amount: total_unpaid_amount,
            paid_count: active
                .iter()
                .filter(|inv| inv.status == InvoiceStatus::Paid)
                .count(),
            unpaid_count: active
                .iter()
                .filter(|inv| inv.status == InvoiceStatus::Unpaid)
                .count(),
            adjusted_count: active
                .iter()
                .filter(|inv| inv.adjusted_amount.is_positive())
                .count(),
            tds_count: active
                .iter()
                .filter(|inv| inv.tds_amount.is_positive())
                .count(),
            hold_count: held.len(),
            hold_amount: held.iter().map(|inv| inv.total_amount).sum(),
            short_total: active.iter().map(|inv| inv.short_amount).sum(),
            excess_total: active.iter().map(|inv| inv.excess_amount).sum(),
            monthly_data,
            service_type_stats,
            patient_status_stats,
        }
    }
}
