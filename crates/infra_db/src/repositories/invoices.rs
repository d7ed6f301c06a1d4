//! Invoice repository
//!
//! Raising, editing, and deleting an invoice also flips the invoicing
//! state of the patients involved; every such multi-document effect runs
//! inside one transaction. Invoice numbers are allocated under the
//! unique index on `invoice_number`: a concurrent allocation of the same
//! number fails the insert and the whole transaction is retried with a
//! fresh scan.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgTransaction};
use tracing::debug;
use uuid::Uuid;

use core_kernel::{HospitalId, InvoiceId, Money, PatientId};
use domain_billing::{next_invoice_number, Invoice, InvoiceItem, PaymentLine};
use domain_patient::PatientInvoiceStatus;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::decode_label;

/// Attempts before giving up on a contended number allocation
const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

#[derive(FromRow)]
struct InvoiceRow {
    id: Uuid,
    invoice_number: String,
    invoice_date: NaiveDate,
    hospital_id: Uuid,
    hospital_name: String,
    hospital_address: String,
    hospital_city: Option<String>,
    hospital_area: Option<String>,
    items: Json<Vec<InvoiceItem>>,
    payments: Json<Vec<PaymentLine>>,
    status: String,
    created_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    /// Rebuilds the domain invoice, re-deriving every aggregate
    ///
    /// Only the sticky part of the stored status matters; everything
    /// else is recomputed from the item and payment lists.
    fn into_domain(self) -> Result<Invoice, DatabaseError> {
        let mut invoice = Invoice {
            id: self.id.into(),
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            month: self.invoice_date.month(),
            year: self.invoice_date.year(),
            hospital_id: self.hospital_id.into(),
            hospital_name: self.hospital_name,
            hospital_address: self.hospital_address,
            hospital_city: self.hospital_city,
            hospital_area: self.hospital_area,
            items: self.items.0,
            payments: self.payments.0,
            total_amount: Money::ZERO,
            paid_amount: Money::ZERO,
            tds_amount: Money::ZERO,
            adjusted_amount: Money::ZERO,
            balance_amount: Money::ZERO,
            short_amount: Money::ZERO,
            excess_amount: Money::ZERO,
            status: decode_label(&self.status)?,
            created_by: self.created_by.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        invoice.recalculate();
        Ok(invoice)
    }
}

const SELECT_COLUMNS: &str = "id, invoice_number, invoice_date, hospital_id, hospital_name, \
     hospital_address, hospital_city, hospital_area, items, payments, status, \
     created_by, created_at, updated_at";

/// Data access for invoices and their patient linkage
#[derive(Clone)]
pub struct InvoiceRepository {
    pool: DatabasePool,
}

impl InvoiceRepository {
    /// Creates a repository over the given pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Raises an invoice, committing its patients in the same transaction
    ///
    /// With `auto_number` the invoice number is allocated by scanning the
    /// year's existing numbers inside the transaction; if a concurrent
    /// writer takes the same number the unique index rejects the insert
    /// and the allocation is retried, up to [`MAX_ALLOCATION_ATTEMPTS`]
    /// times.
    pub async fn create(
        &self,
        mut invoice: Invoice,
        auto_number: bool,
    ) -> Result<Invoice, DatabaseError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut tx = self.pool.begin().await?;

            if auto_number {
                let numbers = numbers_for_year_tx(&mut tx, invoice.year).await?;
                invoice.invoice_number =
                    next_invoice_number(numbers.iter().map(String::as_str), invoice.year);
            }

            match insert_row(&mut tx, &invoice).await {
                Ok(()) => {
                    commit_patients(&mut tx, &invoice, &invoice.patient_ids()).await?;
                    tx.commit().await?;
                    return Ok(invoice);
                }
                Err(e) if e.is_duplicate() && auto_number && attempt < MAX_ALLOCATION_ATTEMPTS => {
                    debug!(
                        number = %invoice.invoice_number,
                        attempt, "invoice number taken concurrently, retrying"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Saves an edited invoice, adjusting patient linkage
    ///
    /// `released` are patients removed from the invoice; `added` are
    /// newly included ones. Both flips and the row update commit
    /// together.
    pub async fn update(
        &self,
        invoice: &Invoice,
        released: &[PatientId],
        added: &[PatientId],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        update_row(&mut tx, invoice).await?;
        release_patients(&mut tx, released).await?;
        commit_patients(&mut tx, invoice, added).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Saves an invoice whose items did not change (payments, status, date)
    pub async fn save(&self, invoice: &Invoice) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        update_row(&mut tx, invoice).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Deletes an invoice, releasing every patient on it
    pub async fn delete(&self, id: InvoiceId) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<InvoiceRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM invoices WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Err(DatabaseError::not_found("Invoice", id));
        };
        let invoice = row.into_domain()?;

        release_patients(&mut tx, &invoice.patient_ids()).await?;
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Fetches an invoice by id
    pub async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DatabaseError> {
        let row: Option<InvoiceRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(InvoiceRow::into_domain).transpose()
    }

    /// Lists every invoice, newest first
    pub async fn list(&self) -> Result<Vec<Invoice>, DatabaseError> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM invoices ORDER BY invoice_date DESC, invoice_number DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceRow::into_domain).collect()
    }

    /// Lists invoices for one hospital, newest first
    pub async fn list_by_hospital(
        &self,
        hospital_id: HospitalId,
    ) -> Result<Vec<Invoice>, DatabaseError> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM invoices WHERE hospital_id = $1 \
             ORDER BY invoice_date DESC, invoice_number DESC"
        ))
        .bind(hospital_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(InvoiceRow::into_domain).collect()
    }

    /// The invoice numbers already allocated for a year
    pub async fn numbers_for_year(&self, year: i32) -> Result<Vec<String>, DatabaseError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT invoice_number FROM invoices WHERE year = $1")
                .bind(year)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(n,)| n).collect())
    }
}

async fn numbers_for_year_tx(
    tx: &mut PgTransaction<'_>,
    year: i32,
) -> Result<Vec<String>, DatabaseError> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT invoice_number FROM invoices WHERE year = $1")
            .bind(year)
            .fetch_all(&mut **tx)
            .await?;
    Ok(rows.into_iter().map(|(n,)| n).collect())
}

async fn insert_row(tx: &mut PgTransaction<'_>, invoice: &Invoice) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, invoice_number, invoice_date, month, year, hospital_id,
            hospital_name, hospital_address, hospital_city, hospital_area,
            items, payments, total_amount, paid_amount, tds_amount,
            adjusted_amount, balance_amount, short_amount, excess_amount,
            status, created_by, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23)
        "#,
    )
    .bind(invoice.id.as_uuid())
    .bind(&invoice.invoice_number)
    .bind(invoice.invoice_date)
    .bind(invoice.month as i32)
    .bind(invoice.year)
    .bind(invoice.hospital_id.as_uuid())
    .bind(&invoice.hospital_name)
    .bind(&invoice.hospital_address)
    .bind(&invoice.hospital_city)
    .bind(&invoice.hospital_area)
    .bind(Json(&invoice.items))
    .bind(Json(&invoice.payments))
    .bind(amount(invoice.total_amount))
    .bind(amount(invoice.paid_amount))
    .bind(amount(invoice.tds_amount))
    .bind(amount(invoice.adjusted_amount))
    .bind(amount(invoice.balance_amount))
    .bind(amount(invoice.short_amount))
    .bind(amount(invoice.excess_amount))
    .bind(invoice.status.as_str())
    .bind(invoice.created_by.map(|id| id.as_uuid()))
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn update_row(tx: &mut PgTransaction<'_>, invoice: &Invoice) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE invoices SET
            invoice_number = $2, invoice_date = $3, month = $4, year = $5,
            hospital_id = $6, hospital_name = $7, hospital_address = $8,
            hospital_city = $9, hospital_area = $10, items = $11, payments = $12,
            total_amount = $13, paid_amount = $14, tds_amount = $15,
            adjusted_amount = $16, balance_amount = $17, short_amount = $18,
            excess_amount = $19, status = $20, updated_at = $21
        WHERE id = $1
        "#,
    )
    .bind(invoice.id.as_uuid())
    .bind(&invoice.invoice_number)
    .bind(invoice.invoice_date)
    .bind(invoice.month as i32)
    .bind(invoice.year)
    .bind(invoice.hospital_id.as_uuid())
    .bind(&invoice.hospital_name)
    .bind(&invoice.hospital_address)
    .bind(&invoice.hospital_city)
    .bind(&invoice.hospital_area)
    .bind(Json(&invoice.items))
    .bind(Json(&invoice.payments))
    .bind(amount(invoice.total_amount))
    .bind(amount(invoice.paid_amount))
    .bind(amount(invoice.tds_amount))
    .bind(amount(invoice.adjusted_amount))
    .bind(amount(invoice.balance_amount))
    .bind(amount(invoice.short_amount))
    .bind(amount(invoice.excess_amount))
    .bind(invoice.status.as_str())
    .bind(invoice.updated_at)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Invoice", invoice.id));
    }
    Ok(())
}

/// Stamps the given patients as committed to `invoice`
///
/// Only eligible patients are flipped; if any id was not eligible the
/// affected-row count comes up short and the transaction is abandoned.
async fn commit_patients(
    tx: &mut PgTransaction<'_>,
    invoice: &Invoice,
    ids: &[PatientId],
) -> Result<(), DatabaseError> {
    if ids.is_empty() {
        return Ok(());
    }

    let uuids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
    let result = sqlx::query(
        r#"
        UPDATE patients SET
            invoice_status = $1, invoice_number = $2, invoice_date = $3, updated_at = NOW()
        WHERE id = ANY($4) AND invoice_status = $5
        "#,
    )
    .bind(PatientInvoiceStatus::InvoiceRaised.as_str())
    .bind(&invoice.invoice_number)
    .bind(invoice.invoice_date)
    .bind(&uuids)
    .bind(PatientInvoiceStatus::ToBeRaised.as_str())
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() != ids.len() as u64 {
        return Err(DatabaseError::ConstraintViolation(
            "One or more patients are not eligible for invoicing".to_string(),
        ));
    }
    Ok(())
}

/// Reverts the given patients to eligible, clearing their stamp
async fn release_patients(
    tx: &mut PgTransaction<'_>,
    ids: &[PatientId],
) -> Result<(), DatabaseError> {
    if ids.is_empty() {
        return Ok(());
    }

    let uuids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
    sqlx::query(
        r#"
        UPDATE patients SET
            invoice_status = $1, invoice_number = NULL, invoice_date = NULL, updated_at = NOW()
        WHERE id = ANY($2) AND invoice_status = $3
        "#,
    )
    .bind(PatientInvoiceStatus::ToBeRaised.as_str())
    .bind(&uuids)
    .bind(PatientInvoiceStatus::InvoiceRaised.as_str())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn amount(money: Money) -> Decimal {
    money.amount()
}
