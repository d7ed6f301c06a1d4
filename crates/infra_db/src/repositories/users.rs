//! User account repository

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use core_kernel::UserId;
use domain_access::{normalize_email, PagePermission, User};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;
use crate::repositories::decode_label;

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    department: Option<String>,
    password_hash: String,
    role: String,
    status: String,
    permissions: Json<Vec<PagePermission>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<User, DatabaseError> {
        Ok(User {
            id: self.id.into(),
            name: self.name,
            email: self.email,
            department: self.department,
            password_hash: self.password_hash,
            role: decode_label(&self.role)?,
            status: decode_label(&self.status)?,
            permissions: self.permissions.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, name, email, department, password_hash, role, status, permissions, created_at, updated_at";

/// Data access for user accounts
#[derive(Clone)]
pub struct UserRepository {
    pool: DatabasePool,
}

impl UserRepository {
    /// Creates a repository over the given pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Inserts a user account
    ///
    /// The unique index on `email` rejects a second signup with the same
    /// address.
    pub async fn create(&self, user: &User) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, department, password_hash, role, status,
                permissions, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.department)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(Json(&user.permissions))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let mapped = DatabaseError::from(e);
                if mapped.is_duplicate() {
                    Err(DatabaseError::duplicate("User", "email", &user.email))
                } else {
                    Err(mapped)
                }
            }
        }
    }

    /// Replaces the stored account with the given user's fields
    pub async fn update(&self, user: &User) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = $2, email = $3, department = $4, password_hash = $5,
                role = $6, status = $7, permissions = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.department)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(Json(&user.permissions))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("User", user.id));
        }
        Ok(())
    }

    /// Fetches a user by id
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Fetches a user by email, normalizing the lookup key first
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_domain).transpose()
    }

    /// Lists every account, oldest first
    pub async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_domain).collect()
    }

    /// Deletes a user account
    pub async fn delete(&self, id: UserId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("User", id));
        }
        Ok(())
    }
}
