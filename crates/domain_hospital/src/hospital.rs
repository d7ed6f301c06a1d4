//! Hospital partner records and status resolution

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AgreementWindow, HospitalId, Rate, ServiceType, UserId};

use crate::error::HospitalError;

/// Days before the MOU end date at which a hospital is flagged `Expired Soon`
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Display status of a hospital partner
///
/// Derived from the manual-inactive flag and the MOU window; see
/// [`HospitalStatus::resolve`] for the precedence rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HospitalStatus {
    Active,
    Inactive,
    #[serde(rename = "Expired Soon")]
    ExpiredSoon,
    Expired,
}

impl HospitalStatus {
    /// Resolves a hospital's status from its agreement state
    ///
    /// Rules, in order:
    /// 1. Manual inactive overrides everything.
    /// 2. An incomplete MOU window cannot expire: `Active`.
    /// 3. An agreement that has not started yet is `Active`.
    /// 4. Otherwise the distance to the end date decides: past it is
    ///    `Expired`, within [`EXPIRY_WARNING_DAYS`] is `Expired Soon`,
    ///    beyond that `Active`.
    pub fn resolve(manual_inactive: bool, window: &AgreementWindow, today: NaiveDate) -> Self {
        if manual_inactive {
            return HospitalStatus::Inactive;
        }

        if !window.is_complete() {
            return HospitalStatus::Active;
        }

        if window.starts_after(today) {
            return HospitalStatus::Active;
        }

        match window.days_until_end(today) {
            Some(days) if days < 0 => HospitalStatus::Expired,
            Some(days) if days <= EXPIRY_WARNING_DAYS => HospitalStatus::ExpiredSoon,
            _ => HospitalStatus::Active,
        }
    }

    /// Canonical label used in API payloads and the database
    pub fn as_str(&self) -> &'static str {
        match self {
            HospitalStatus::Active => "Active",
            HospitalStatus::Inactive => "Inactive",
            HospitalStatus::ExpiredSoon => "Expired Soon",
            HospitalStatus::Expired => "Expired",
        }
    }
}

/// Input for creating or replacing a hospital record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHospital {
    pub name: String,
    #[serde(default)]
    pub alternate_name: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub op_share: Decimal,
    #[serde(default)]
    pub ip_share: Decimal,
    #[serde(default)]
    pub diagnostic_share: Decimal,
    #[serde(default)]
    pub mou_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub mou_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub mou_file_url: Option<String>,
    #[serde(default)]
    pub manual_inactive: bool,
}

/// A hospital partner record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: HospitalId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_name: Option<String>,
    pub address: String,
    pub area: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
    pub op_share: Rate,
    pub ip_share: Rate,
    pub diagnostic_share: Rate,
    pub mou_start_date: Option<NaiveDate>,
    pub mou_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mou_file_url: Option<String>,
    pub manual_inactive: bool,
    /// Cached status; recomputed via [`Hospital::refresh_status`] on
    /// every read and write
    pub status: HospitalStatus,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hospital {
    /// Creates a hospital record from validated input
    pub fn create(
        input: NewHospital,
        created_by: Option<UserId>,
        today: NaiveDate,
    ) -> Result<Self, HospitalError> {
        if input.name.trim().is_empty() {
            return Err(HospitalError::MissingName);
        }

        let window = AgreementWindow::new(input.mou_start_date, input.mou_end_date)?;
        let status = HospitalStatus::resolve(input.manual_inactive, &window, today);
        let now = Utc::now();

        Ok(Self {
            id: HospitalId::new_ordered(),
            name: input.name,
            alternate_name: input.alternate_name,
            address: input.address,
            area: input.area,
            city: input.city,
            state: input.state,
            pin_code: input.pin_code,
            contact_person: input.contact_person,
            phone: input.phone,
            email: input.email,
            op_share: Rate::share(input.op_share)?,
            ip_share: Rate::share(input.ip_share)?,
            diagnostic_share: Rate::share(input.diagnostic_share)?,
            mou_start_date: input.mou_start_date,
            mou_end_date: input.mou_end_date,
            mou_file_url: input.mou_file_url,
            manual_inactive: input.manual_inactive,
            status,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the editable fields from new input, re-deriving status
    pub fn apply(&mut self, input: NewHospital, today: NaiveDate) -> Result<(), HospitalError> {
        if input.name.trim().is_empty() {
            return Err(HospitalError::MissingName);
        }

        // Validate the window before mutating anything.
        AgreementWindow::new(input.mou_start_date, input.mou_end_date)?;

        self.name = input.name;
        self.alternate_name = input.alternate_name;
        self.address = input.address;
        self.area = input.area;
        self.city = input.city;
        self.state = input.state;
        self.pin_code = input.pin_code;
        self.contact_person = input.contact_person;
        self.phone = input.phone;
        self.email = input.email;
        self.op_share = Rate::share(input.op_share)?;
        self.ip_share = Rate::share(input.ip_share)?;
        self.diagnostic_share = Rate::share(input.diagnostic_share)?;
        self.mou_start_date = input.mou_start_date;
        self.mou_end_date = input.mou_end_date;
        self.mou_file_url = input.mou_file_url;
        self.manual_inactive = input.manual_inactive;
        self.updated_at = Utc::now();
        self.refresh_status(today);

        Ok(())
    }

    /// The MOU window of this hospital
    pub fn agreement_window(&self) -> AgreementWindow {
        AgreementWindow {
            start: self.mou_start_date,
            end: self.mou_end_date,
        }
    }

    /// Recomputes the cached status against the given date
    pub fn refresh_status(&mut self, today: NaiveDate) {
        self.status =
            HospitalStatus::resolve(self.manual_inactive, &self.agreement_window(), today);
    }

    /// The status this hospital would display on the given date
    pub fn status_on(&self, today: NaiveDate) -> HospitalStatus {
        HospitalStatus::resolve(self.manual_inactive, &self.agreement_window(), today)
    }

    /// The negotiated share percentage for a service line
    pub fn share_for(&self, service: ServiceType) -> Rate {
        match service {
            ServiceType::Op => self.op_share,
            ServiceType::Ip => self.ip_share,
            ServiceType::Diagnostic => self.diagnostic_share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(name: &str) -> NewHospital {
        NewHospital {
            name: name.to_string(),
            alternate_name: None,
            address: "12 Mount Road".to_string(),
            area: "Guindy".to_string(),
            city: "Chennai".to_string(),
            state: "Tamil Nadu".to_string(),
            pin_code: "600032".to_string(),
            contact_person: "Accounts".to_string(),
            phone: "044-1234567".to_string(),
            email: "accounts@example.org".to_string(),
            op_share: dec!(10),
            ip_share: dec!(15),
            diagnostic_share: dec!(20),
            mou_start_date: None,
            mou_end_date: None,
            mou_file_url: None,
            manual_inactive: false,
        }
    }

    #[test]
    fn test_name_required() {
        let result = Hospital::create(input("  "), None, date(2026, 8, 23));
        assert!(matches!(result, Err(HospitalError::MissingName)));
    }

    #[test]
    fn test_share_selection() {
        let hospital = Hospital::create(input("Apex Care"), None, date(2026, 8, 23)).unwrap();
        assert_eq!(hospital.share_for(ServiceType::Op).as_percentage(), dec!(10));
        assert_eq!(hospital.share_for(ServiceType::Ip).as_percentage(), dec!(15));
        assert_eq!(
            hospital.share_for(ServiceType::Diagnostic).as_percentage(),
            dec!(20)
        );
    }

    #[test]
    fn test_status_serializes_with_spaces() {
        assert_eq!(
            serde_json::to_string(&HospitalStatus::ExpiredSoon).unwrap(),
            "\"Expired Soon\""
        );
    }
}
