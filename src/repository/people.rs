//! People repository, read-only
//!
//! The `people` table belongs to the congregation-management system; the
//! library only looks borrowers up and joins them into loan/reservation lists.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::person::{Person, PersonQuery},
};

#[derive(Clone)]
pub struct PeopleRepository {
    pool: Pool<Postgres>,
}

impl PeopleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get person by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Person> {
        sqlx::query_as::<_, Person>("SELECT * FROM people WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Person with id {} not found", id)))
    }

    /// List people with optional name/email search
    pub async fn list(&self, query: &PersonQuery) -> AppResult<(Vec<Person>, i64)> {
        let per_page = query.per_page.unwrap_or(50).clamp(1, 200);
        let offset = (query.page.unwrap_or(1).max(1) - 1) * per_page;

        let people = sqlx::query_as::<_, Person>(
            r#"
            SELECT * FROM people
            WHERE ($1::text IS NULL
                   OR full_name ILIKE '%' || $1 || '%'
                   OR email ILIKE '%' || $1 || '%')
            ORDER BY full_name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&query.search)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM people
            WHERE ($1::text IS NULL
                   OR full_name ILIKE '%' || $1 || '%'
                   OR email ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(&query.search)
        .fetch_one(&self.pool)
        .await?;

        Ok((people, total))
    }
}
