//! Dashboard DTOs

use serde::Deserialize;

use core_kernel::HospitalId;
use domain_billing::{InvoiceStatus, StatsFilter};

/// Dashboard statistics query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub appointment_month: Option<u32>,
    #[serde(default)]
    pub hospital_id: Option<HospitalId>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

impl From<StatsQuery> for StatsFilter {
    fn from(query: StatsQuery) -> Self {
        StatsFilter {
            year: query.year,
            month: query.month,
            appointment_month: query.appointment_month,
            hospital_id: query.hospital_id,
            city: query.city,
            area: query.area,
            status: query.status,
        }
    }
}
