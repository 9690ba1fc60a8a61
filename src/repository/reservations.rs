//! Reservations repository for database operations

use chrono::{Duration, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    lifecycle::status::derive_reservation_status,
    lifecycle::transitions::ReservationUpdate,
    models::{
        book::BookShort,
        person::PersonShort,
        reservation::{
            CreateReservation, Reservation, ReservationDetails, ReservationQuery,
            ReservationStatus, ReservationStatusFilter,
        },
    },
};

const RESERVATION_JOIN: &str = r#"
    FROM reservations r
    JOIN books b ON r.book_id = b.id
    JOIN people p ON r.person_id = p.id
"#;

const RESERVATION_JOIN_COLUMNS: &str = r#"
    r.id, r.book_id, r.person_id, r.reserved_at, r.expires_at, r.status,
    b.title AS book_title, b.author AS book_author, b.cover_image_url AS book_cover_image_url,
    p.full_name AS person_full_name, p.email AS person_email
"#;

fn details_from_row(row: &PgRow) -> ReservationDetails {
    let status: ReservationStatus = row.get("status");
    let expires_at = row.get("expires_at");
    let view = derive_reservation_status(status, expires_at, Utc::now());

    ReservationDetails {
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
        reserved_at: row.get("reserved_at"),
        expires_at,
        status,
        status_label: view.label.to_string(),
        is_expired: view.is_expired,
        days_remaining: view.days_remaining,
    }
}

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    /// Get reservation with joined book/person and derived status
    pub async fn get_details(&self, id: Uuid) -> AppResult<ReservationDetails> {
        let sql = format!("SELECT {RESERVATION_JOIN_COLUMNS} {RESERVATION_JOIN} WHERE r.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))?;

        Ok(details_from_row(&row))
    }

    /// List reservations joined with book and person, newest first.
    ///
    /// The `expired` filter matches stored-active rows past their expiry plus
    /// legacy stored-expired rows.
    pub async fn list(&self, query: &ReservationQuery) -> AppResult<Vec<ReservationDetails>> {
        let per_page = query.per_page.unwrap_or(100).clamp(1, 500);
        let offset = (query.page.unwrap_or(1).max(1) - 1) * per_page;

        let (status, expired_only, exclude_expired) = match query.status {
            Some(ReservationStatusFilter::Active) => (Some(ReservationStatus::Active), false, true),
            Some(ReservationStatusFilter::Fulfilled) => {
                (Some(ReservationStatus::Fulfilled), false, false)
            }
            Some(ReservationStatusFilter::Cancelled) => {
                (Some(ReservationStatus::Cancelled), false, false)
            }
            Some(ReservationStatusFilter::Expired) => (None, true, false),
            None => (None, false, false),
        };

        let sql = format!(
            r#"
            SELECT {RESERVATION_JOIN_COLUMNS}
            {RESERVATION_JOIN}
            WHERE ($1::text IS NULL
                   OR b.title ILIKE '%' || $1 || '%'
                   OR b.author ILIKE '%' || $1 || '%'
                   OR p.full_name ILIKE '%' || $1 || '%')
              AND ($2::reservation_status IS NULL OR r.status = $2)
              AND (NOT $3 OR r.status = 'expired'
                   OR (r.status = 'active' AND r.expires_at < NOW()))
              AND (NOT $4 OR r.expires_at > NOW())
              AND ($5::uuid IS NULL OR r.person_id = $5)
              AND ($6::uuid IS NULL OR r.book_id = $6)
            ORDER BY r.reserved_at DESC
            LIMIT $7 OFFSET $8
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(&query.search)
            .bind(status)
            .bind(expired_only)
            .bind(exclude_expired)
            .bind(query.person_id)
            .bind(query.book_id)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Create a reservation. One active reservation per person and book.
    pub async fn create(
        &self,
        reservation: &CreateReservation,
        hold_period_days: i64,
    ) -> AppResult<Reservation> {
        let now = Utc::now();
        let expires_at = now + Duration::days(hold_period_days);

        let book_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1 AND active)")
                .bind(reservation.book_id)
                .fetch_one(&self.pool)
                .await?;
        if !book_exists {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                reservation.book_id
            )));
        }

        let person_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM people WHERE id = $1)")
                .bind(reservation.person_id)
                .fetch_one(&self.pool)
                .await?;
        if !person_exists {
            return Err(AppError::NotFound(format!(
                "Person with id {} not found",
                reservation.person_id
            )));
        }

        let already_reserved: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM reservations
                WHERE book_id = $1 AND person_id = $2
                  AND status = 'active' AND expires_at > NOW()
            )
            "#,
        )
        .bind(reservation.book_id)
        .bind(reservation.person_id)
        .fetch_one(&self.pool)
        .await?;

        if already_reserved {
            return Err(AppError::Conflict(
                "Person already has an active reservation for this book".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (book_id, person_id, reserved_at, expires_at, status)
            VALUES ($1, $2, $3, $4, 'active')
            RETURNING *
            "#,
        )
        .bind(reservation.book_id)
        .bind(reservation.person_id)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist the field updates produced by the transition applier
    pub async fn apply_update(&self, id: Uuid, update: &ReservationUpdate) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Reservation with id {} not found", id)))
    }

    /// Count active (unexpired) reservations
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE status = 'active' AND expires_at > NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
