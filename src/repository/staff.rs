//! Staff accounts repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::staff::{StaffAccount, StaffRole},
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: Pool<Postgres>,
}

impl StaffRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get staff account by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<StaffAccount> {
        sqlx::query_as::<_, StaffAccount>("SELECT * FROM staff_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff account with id {} not found", id)))
    }

    /// Get staff account by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<StaffAccount>> {
        let account = sqlx::query_as::<_, StaffAccount>(
            "SELECT * FROM staff_accounts WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Count staff accounts
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff_accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a staff account
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        display_name: &str,
        role: StaffRole,
    ) -> AppResult<StaffAccount> {
        let created = sqlx::query_as::<_, StaffAccount>(
            r#"
            INSERT INTO staff_accounts (username, password_hash, display_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(display_name)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
