//! Loans repository for database operations

use chrono::{Duration, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    lifecycle::status::derive_loan_status,
    lifecycle::transitions::LoanUpdate,
    models::{
        book::BookShort,
        loan::{CreateLoan, Loan, LoanDetails, LoanQuery, LoanStatus, LoanStatusFilter},
        person::PersonShort,
    },
};

const LOAN_JOIN: &str = r#"
    FROM loans l
    JOIN books b ON l.book_id = b.id
    JOIN people p ON l.person_id = p.id
"#;

const LOAN_JOIN_COLUMNS: &str = r#"
    l.id, l.book_id, l.person_id, l.loan_date, l.due_date, l.returned_date,
    l.status, l.renewal_count, l.notes,
    b.title AS book_title, b.author AS book_author, b.cover_image_url AS book_cover_image_url,
    p.full_name AS person_full_name, p.email AS person_email
"#;

fn details_from_row(row: &PgRow) -> LoanDetails {
    let status: LoanStatus = row.get("status");
    let due_date = row.get("due_date");
    let view = derive_loan_status(status, due_date, Utc::now());

    LoanDetails {
        id: row.get("id"),
        book: BookShort {
            id: row.get("book_id"),
            title: row.get("book_title"),
            author: row.get("book_author"),
            cover_image_url: row.get("book_cover_image_url"),
        },
        person: PersonShort {
            id: row.get("person_id"),
            full_name: row.get("person_full_name"),
            email: row.get("person_email"),
        },
        loan_date: row.get("loan_date"),
        due_date,
        returned_date: row.get("returned_date"),
        status,
        renewal_count: row.get("renewal_count"),
        notes: row.get("notes"),
        status_label: view.label.to_string(),
        is_late: view.is_late,
        late_days: view.late_days,
    }
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loan with joined book/person and derived status
    pub async fn get_details(&self, id: Uuid) -> AppResult<LoanDetails> {
        let sql = format!("SELECT {LOAN_JOIN_COLUMNS} {LOAN_JOIN} WHERE l.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        Ok(details_from_row(&row))
    }

    /// List loans joined with book and person, newest first.
    ///
    /// The `overdue` filter is resolved against the clock (open loans past their
    /// due date), never against a stored label.
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<LoanDetails>> {
        let per_page = query.per_page.unwrap_or(100).clamp(1, 500);
        let offset = (query.page.unwrap_or(1).max(1) - 1) * per_page;

        let (status, overdue_only) = match query.status {
            Some(LoanStatusFilter::Active) => (Some(LoanStatus::Active), false),
            Some(LoanStatusFilter::Renewed) => (Some(LoanStatus::Renewed), false),
            Some(LoanStatusFilter::Returned) => (Some(LoanStatus::Returned), false),
            Some(LoanStatusFilter::Overdue) => (None, true),
            None => (None, false),
        };

        let sql = format!(
            r#"
            SELECT {LOAN_JOIN_COLUMNS}
            {LOAN_JOIN}
            WHERE ($1::text IS NULL
                   OR b.title ILIKE '%' || $1 || '%'
                   OR b.author ILIKE '%' || $1 || '%'
                   OR p.full_name ILIKE '%' || $1 || '%')
              AND ($2::loan_status IS NULL OR l.status = $2)
              AND (NOT $3 OR (l.status IN ('active', 'renewed') AND l.due_date < NOW()))
              AND ($4::uuid IS NULL OR l.person_id = $4)
              AND ($5::uuid IS NULL OR l.book_id = $5)
            ORDER BY l.loan_date DESC
            LIMIT $6 OFFSET $7
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(&query.search)
            .bind(status)
            .bind(overdue_only)
            .bind(query.person_id)
            .bind(query.book_id)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Create a loan (checkout).
    ///
    /// Runs in one transaction with the book row locked, so two concurrent
    /// checkouts cannot both take the last copy.
    pub async fn create(&self, loan: &CreateLoan, loan_period_days: i64) -> AppResult<Loan> {
        let now = Utc::now();
        let due_date = now + Duration::days(loan_period_days);

        let mut tx = self.pool.begin().await?;

        let book_row = sqlx::query(
            "SELECT copies_total, under_maintenance FROM books WHERE id = $1 AND active FOR UPDATE",
        )
        .bind(loan.book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", loan.book_id)))?;

        if book_row.get::<bool, _>("under_maintenance") {
            return Err(AppError::Conflict("Book is under maintenance".to_string()));
        }

        let person_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM people WHERE id = $1)")
            .bind(loan.person_id)
            .fetch_one(&mut *tx)
            .await?;
        if !person_exists {
            return Err(AppError::NotFound(format!(
                "Person with id {} not found",
                loan.person_id
            )));
        }

        let copies_total: i16 = book_row.get("copies_total");
        let open_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE book_id = $1 AND status IN ('active', 'renewed')",
        )
        .bind(loan.book_id)
        .fetch_one(&mut *tx)
        .await?;

        if open_loans >= i64::from(copies_total) {
            return Err(AppError::Conflict(format!(
                "No copies available ({}/{} on loan)",
                open_loans, copies_total
            )));
        }

        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, person_id, loan_date, due_date, status, renewal_count, notes)
            VALUES ($1, $2, $3, $4, 'active', 0, $5)
            RETURNING *
            "#,
        )
        .bind(loan.book_id)
        .bind(loan.person_id)
        .bind(now)
        .bind(due_date)
        .bind(&loan.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Persist the field updates produced by the transition applier
    pub async fn apply_update(&self, id: Uuid, update: &LoanUpdate) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET
                status = $2,
                due_date = COALESCE($3, due_date),
                returned_date = COALESCE($4, returned_date),
                renewal_count = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.status)
        .bind(update.due_date)
        .bind(update.returned_date)
        .bind(update.renewal_count)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Count open loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status IN ('active', 'renewed')")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count open loans past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE status IN ('active', 'renewed') AND due_date < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
