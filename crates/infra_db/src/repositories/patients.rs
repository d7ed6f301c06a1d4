//! Patient repository

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use core_kernel::{Money, PatientId, Rate};
use domain_patient::{Patient, PatientInvoiceStatus};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::decode_label;

#[derive(FromRow)]
struct PatientRow {
    id: Uuid,
    name: String,
    phone: String,
    service_type: String,
    lead_type: String,
    source_type: String,
    hospital_id: Uuid,
    hospital_name: String,
    hospital_address: String,
    city: String,
    area: String,
    doctor_name: String,
    bd_name: String,
    procedure: String,
    bill_amount: Decimal,
    dci_charges: Decimal,
    final_amount: Decimal,
    share_percent: Decimal,
    share_amount: Decimal,
    invoice_status: String,
    patient_date: NaiveDate,
    month: i32,
    year: i32,
    remarks: Option<String>,
    invoice_number: Option<String>,
    invoice_date: Option<NaiveDate>,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PatientRow {
    fn into_domain(self) -> Result<Patient, DatabaseError> {
        Ok(Patient {
            id: self.id.into(),
            name: self.name,
            phone: self.phone,
            service_type: decode_label(&self.service_type)?,
            lead_type: decode_label(&self.lead_type)?,
            source_type: decode_label(&self.source_type)?,
            hospital_id: self.hospital_id.into(),
            hospital_name: self.hospital_name,
            hospital_address: self.hospital_address,
            city: self.city,
            area: self.area,
            doctor_name: self.doctor_name,
            bd_name: self.bd_name,
            procedure: self.procedure,
            bill_amount: Money::new(self.bill_amount),
            dci_charges: Money::new(self.dci_charges),
            final_amount: Money::new(self.final_amount),
            share_percent: Rate::from_percentage(self.share_percent),
            share_amount: Money::new(self.share_amount),
            invoice_status: decode_label(&self.invoice_status)?,
            patient_date: self.patient_date,
            month: self.month as u32,
            year: self.year,
            remarks: self.remarks,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            created_by: self.created_by.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, phone, service_type, lead_type, source_type, hospital_id, \
     hospital_name, hospital_address, city, area, doctor_name, bd_name, procedure, \
     bill_amount, dci_charges, final_amount, share_percent, share_amount, \
     invoice_status, patient_date, month, year, remarks, invoice_number, invoice_date, \
     created_by, created_at, updated_at";

/// Data access for patient visit records
#[derive(Clone)]
pub struct PatientRepository {
    pool: DatabasePool,
}

impl PatientRepository {
    /// Creates a repository over the given pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Inserts a patient record
    pub async fn create(&self, patient: &Patient) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO patients (
                id, name, phone, service_type, lead_type, source_type, hospital_id,
                hospital_name, hospital_address, city, area, doctor_name, bd_name,
                procedure, bill_amount, dci_charges, final_amount, share_percent,
                share_amount, invoice_status, patient_date, month, year, remarks,
                invoice_number, invoice_date, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29)
            "#,
        )
        .bind(patient.id.as_uuid())
        .bind(&patient.name)
        .bind(&patient.phone)
        .bind(patient.service_type.as_str())
        .bind(label(&patient.lead_type)?)
        .bind(label(&patient.source_type)?)
        .bind(patient.hospital_id.as_uuid())
        .bind(&patient.hospital_name)
        .bind(&patient.hospital_address)
        .bind(&patient.city)
        .bind(&patient.area)
        .bind(&patient.doctor_name)
        .bind(&patient.bd_name)
        .bind(&patient.procedure)
        .bind(patient.bill_amount.amount())
        .bind(patient.dci_charges.amount())
        .bind(patient.final_amount.amount())
        .bind(patient.share_percent.as_percentage())
        .bind(patient.share_amount.amount())
        .bind(patient.invoice_status.as_str())
        .bind(patient.patient_date)
        .bind(patient.month as i32)
        .bind(patient.year)
        .bind(&patient.remarks)
        .bind(&patient.invoice_number)
        .bind(patient.invoice_date)
        .bind(patient.created_by.map(|id| id.as_uuid()))
        .bind(patient.created_at)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replaces the stored record with the given patient's fields
    pub async fn update(&self, patient: &Patient) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE patients SET
                name = $2, phone = $3, service_type = $4, lead_type = $5,
                source_type = $6, hospital_id = $7, hospital_name = $8,
                hospital_address = $9, city = $10, area = $11, doctor_name = $12,
                bd_name = $13, procedure = $14, bill_amount = $15, dci_charges = $16,
                final_amount = $17, share_percent = $18, share_amount = $19,
                invoice_status = $20, patient_date = $21, month = $22, year = $23,
                remarks = $24, invoice_number = $25, invoice_date = $26, updated_at = $27
            WHERE id = $1
            "#,
        )
        .bind(patient.id.as_uuid())
        .bind(&patient.name)
        .bind(&patient.phone)
        .bind(patient.service_type.as_str())
        .bind(label(&patient.lead_type)?)
        .bind(label(&patient.source_type)?)
        .bind(patient.hospital_id.as_uuid())
        .bind(&patient.hospital_name)
        .bind(&patient.hospital_address)
        .bind(&patient.city)
        .bind(&patient.area)
        .bind(&patient.doctor_name)
        .bind(&patient.bd_name)
        .bind(&patient.procedure)
        .bind(patient.bill_amount.amount())
        .bind(patient.dci_charges.amount())
        .bind(patient.final_amount.amount())
        .bind(patient.share_percent.as_percentage())
        .bind(patient.share_amount.amount())
        .bind(patient.invoice_status.as_str())
        .bind(patient.patient_date)
        .bind(patient.month as i32)
        .bind(patient.year)
        .bind(&patient.remarks)
        .bind(&patient.invoice_number)
        .bind(patient.invoice_date)
        .bind(patient.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Patient", patient.id));
        }
        Ok(())
    }

    /// Fetches a patient by id
    pub async fn find_by_id(&self, id: PatientId) -> Result<Option<Patient>, DatabaseError> {
        let row: Option<PatientRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM patients WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PatientRow::into_domain).transpose()
    }

    /// Lists every patient, newest visit first
    pub async fn list(&self) -> Result<Vec<Patient>, DatabaseError> {
        let rows: Vec<PatientRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM patients ORDER BY patient_date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PatientRow::into_domain).collect()
    }

    /// Lists patients eligible for invoicing at the given hospital
    pub async fn list_eligible(
        &self,
        hospital_id: core_kernel::HospitalId,
    ) -> Result<Vec<Patient>, DatabaseError> {
        let rows: Vec<PatientRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM patients \
             WHERE hospital_id = $1 AND invoice_status = $2 \
             ORDER BY patient_date"
        ))
        .bind(hospital_id.as_uuid())
        .bind(PatientInvoiceStatus::ToBeRaised.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PatientRow::into_domain).collect()
    }

    /// Deletes a patient record
    ///
    /// A patient committed to an invoice cannot be deleted; it must be
    /// removed from the invoice first.
    pub async fn delete(&self, id: PatientId) -> Result<(), DatabaseError> {
        let committed: Option<(String,)> = sqlx::query_as(
            "SELECT invoice_status FROM patients WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some((status,)) = committed else {
            return Err(DatabaseError::not_found("Patient", id));
        };
        if status == PatientInvoiceStatus::InvoiceRaised.as_str() {
            return Err(DatabaseError::ConstraintViolation(
                "Patient is on an invoice and cannot be deleted".to_string(),
            ));
        }

        sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn label<T: serde::Serialize>(value: &T) -> Result<String, DatabaseError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => Ok(s),
        Ok(other) => Err(DatabaseError::SerializationError(format!(
            "expected string label, got {}",
            other
        ))),
        Err(e) => Err(DatabaseError::SerializationError(e.to_string())),
    }
}
