//! Hospital repository
//!
//! The stored `status` column is a cache; reads re-derive the status
//! against the caller's reference date, so a hospital whose MOU lapsed
//! overnight reads `Expired` without any row having been touched.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use domain_hospital::{Hospital, HospitalStatus};
use core_kernel::Rate;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

#[derive(FromRow)]
struct HospitalRow {
    id: Uuid,
    name: String,
    alternate_name: Option<String>,
    address: String,
    area: String,
    city: String,
    state: String,
    pin_code: String,
    contact_person: String,
    phone: String,
    email: String,
    op_share: Decimal,
    ip_share: Decimal,
    diagnostic_share: Decimal,
    mou_start_date: Option<NaiveDate>,
    mou_end_date: Option<NaiveDate>,
    mou_file_url: Option<String>,
    manual_inactive: bool,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HospitalRow {
    fn into_domain(self, today: NaiveDate) -> Hospital {
        let mut hospital = Hospital {
            id: self.id.into(),
            name: self.name,
            alternate_name: self.alternate_name,
            address: self.address,
            area: self.area,
            city: self.city,
            state: self.state,
            pin_code: self.pin_code,
            contact_person: self.contact_person,
            phone: self.phone,
            email: self.email,
            op_share: Rate::from_percentage(self.op_share),
            ip_share: Rate::from_percentage(self.ip_share),
            diagnostic_share: Rate::from_percentage(self.diagnostic_share),
            mou_start_date: self.mou_start_date,
            mou_end_date: self.mou_end_date,
            mou_file_url: self.mou_file_url,
            manual_inactive: self.manual_inactive,
            status: HospitalStatus::Active,
            created_by: self.created_by.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        hospital.refresh_status(today);
        hospital
    }
}

const SELECT_COLUMNS: &str = "id, name, alternate_name, address, area, city, state, pin_code, \
     contact_person, phone, email, op_share, ip_share, diagnostic_share, \
     mou_start_date, mou_end_date, mou_file_url, manual_inactive, \
     created_by, created_at, updated_at";

/// Data access for hospital partner records
#[derive(Clone)]
pub struct HospitalRepository {
    pool: DatabasePool,
}

impl HospitalRepository {
    /// Creates a repository over the given pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Inserts a hospital record
    pub async fn create(&self, hospital: &Hospital) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO hospitals (
                id, name, alternate_name, address, area, city, state, pin_code,
                contact_person, phone, email, op_share, ip_share, diagnostic_share,
                mou_start_date, mou_end_date, mou_file_url, manual_inactive,
                status, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22)
            "#,
        )
        .bind(hospital.id.as_uuid())
        .bind(&hospital.name)
        .bind(&hospital.alternate_name)
        .bind(&hospital.address)
        .bind(&hospital.area)
        .bind(&hospital.city)
        .bind(&hospital.state)
        .bind(&hospital.pin_code)
        .bind(&hospital.contact_person)
        .bind(&hospital.phone)
        .bind(&hospital.email)
        .bind(hospital.op_share.as_percentage())
        .bind(hospital.ip_share.as_percentage())
        .bind(hospital.diagnostic_share.as_percentage())
        .bind(hospital.mou_start_date)
        .bind(hospital.mou_end_date)
        .bind(&hospital.mou_file_url)
        .bind(hospital.manual_inactive)
        .bind(hospital.status.as_str())
        .bind(hospital.created_by.map(|id| id.as_uuid()))
        .bind(hospital.created_at)
        .bind(hospital.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces the stored record with the given hospital's fields
    pub async fn update(&self, hospital: &Hospital) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE hospitals SET
                name = $2, alternate_name = $3, address = $4, area = $5, city = $6,
                state = $7, pin_code = $8, contact_person = $9, phone = $10, email = $11,
                op_share = $12, ip_share = $13, diagnostic_share = $14,
                mou_start_date = $15, mou_end_date = $16, mou_file_url = $17,
                manual_inactive = $18, status = $19, updated_at = $20
            WHERE id = $1
            "#,
        )
        .bind(hospital.id.as_uuid())
        .bind(&hospital.name)
        .bind(&hospital.alternate_name)
        .bind(&hospital.address)
        .bind(&hospital.area)
        .bind(&hospital.city)
        .bind(&hospital.state)
        .bind(&hospital.pin_code)
        .bind(&hospital.contact_person)
        .bind(&hospital.phone)
        .bind(&hospital.email)
        .bind(hospital.op_share.as_percentage())
        .bind(hospital.ip_share.as_percentage())
        .bind(hospital.diagnostic_share.as_percentage())
        .bind(hospital.mou_start_date)
        .bind(hospital.mou_end_date)
        .bind(&hospital.mou_file_url)
        .bind(hospital.manual_inactive)
        .bind(hospital.status.as_str())
        .bind(hospital.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Hospital", hospital.id));
        }
        Ok(())
    }

    /// Fetches a hospital by id, re-deriving its status for `today`
    pub async fn find_by_id(
        &self,
        id: core_kernel::HospitalId,
        today: NaiveDate,
    ) -> Result<Option<Hospital>, DatabaseError> {
        let row: Option<HospitalRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM hospitals WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_domain(today)))
    }

    /// Lists every hospital, statuses derived for `today`
    pub async fn list(&self, today: NaiveDate) -> Result<Vec<Hospital>, DatabaseError> {
        let rows: Vec<HospitalRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM hospitals ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_domain(today)).collect())
    }

    /// Deletes a hospital record
    pub async fn delete(&self, id: core_kernel::HospitalId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM hospitals WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Hospital", id));
        }
        Ok(())
    }
}
