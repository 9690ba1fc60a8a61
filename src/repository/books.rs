//! Books repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookRow, CreateBook, UpdateBook},
};

/// Columns shared by every book query, including the derived counts over open
/// loans and unexpired active reservations.
const BOOK_ROW_COLUMNS: &str = r#"
    b.*,
    (SELECT COUNT(*) FROM loans l
      WHERE l.book_id = b.id AND l.status IN ('active', 'renewed')) AS copies_on_loan,
    (SELECT COUNT(*) FROM reservations r
      WHERE r.book_id = b.id AND r.status = 'active' AND r.expires_at > NOW()) AS active_reservations
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID with derived counts
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookRow> {
        let query = format!("SELECT {BOOK_ROW_COLUMNS} FROM books b WHERE b.id = $1 AND b.active");
        sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search active books with optional free-text, category and availability
    /// filters. The availability filter mirrors the derivation rules over the
    /// same counts, so a filtered page never disagrees with the displayed badge.
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<BookRow>, i64)> {
        let per_page = query.per_page.unwrap_or(50).clamp(1, 200);
        let offset = (query.page.unwrap_or(1).max(1) - 1) * per_page;
        let availability = query.availability.map(|a| a.code());

        let filtered = format!(
            r#"
            SELECT * FROM (
                SELECT {BOOK_ROW_COLUMNS}
                FROM books b
                WHERE b.active
                  AND ($1::text IS NULL
                       OR b.title ILIKE '%' || $1 || '%'
                       OR b.author ILIKE '%' || $1 || '%'
                       OR b.isbn ILIKE '%' || $1 || '%'
                       OR b.publisher ILIKE '%' || $1 || '%')
                  AND ($2::text IS NULL OR b.category = $2)
            ) x
            WHERE ($3::text IS NULL
                   OR ($3 = 'under_maintenance' AND x.under_maintenance)
                   OR ($3 = 'loaned' AND NOT x.under_maintenance
                       AND x.copies_on_loan >= x.copies_total)
                   OR ($3 = 'reserved' AND NOT x.under_maintenance
                       AND x.copies_on_loan < x.copies_total
                       AND x.active_reservations >= x.copies_total - x.copies_on_loan)
                   OR ($3 = 'available' AND NOT x.under_maintenance
                       AND x.copies_on_loan < x.copies_total
                       AND x.active_reservations < x.copies_total - x.copies_on_loan))
            "#
        );

        let sql = format!("{filtered} ORDER BY x.title LIMIT $4 OFFSET $5");
        let books = sqlx::query_as::<_, BookRow>(&sql)
            .bind(&query.search)
            .bind(&query.category)
            .bind(availability)
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM ({filtered}) c");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&query.search)
            .bind(&query.category)
            .bind(availability)
            .fetch_one(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Distinct categories of active books, for the catalog filter
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT category FROM books WHERE active AND category IS NOT NULL ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, publisher, isbn, category, location, synopsis,
                               cover_image_url, publication_year, page_count, copies_total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.publisher)
        .bind(&book.isbn)
        .bind(&book.category)
        .bind(&book.location)
        .bind(&book.synopsis)
        .bind(&book.cover_image_url)
        .bind(book.publication_year)
        .bind(book.page_count)
        .bind(book.copies_total.unwrap_or(1))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a book; absent fields keep their current value
    pub async fn update(&self, id: Uuid, update: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                publisher = COALESCE($4, publisher),
                isbn = COALESCE($5, isbn),
                category = COALESCE($6, category),
                location = COALESCE($7, location),
                synopsis = COALESCE($8, synopsis),
                cover_image_url = COALESCE($9, cover_image_url),
                publication_year = COALESCE($10, publication_year),
                page_count = COALESCE($11, page_count),
                copies_total = COALESCE($12, copies_total),
                under_maintenance = COALESCE($13, under_maintenance),
                updated_at = NOW()
            WHERE id = $1 AND active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.author)
        .bind(&update.publisher)
        .bind(&update.isbn)
        .bind(&update.category)
        .bind(&update.location)
        .bind(&update.synopsis)
        .bind(&update.cover_image_url)
        .bind(update.publication_year)
        .bind(update.page_count)
        .bind(update.copies_total)
        .bind(update.under_maintenance)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Soft-delete a book. Refused while open loans reference it.
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let open_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE book_id = $1 AND status IN ('active', 'renewed')",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if open_loans > 0 {
            return Err(AppError::Conflict(format!(
                "Book has {} open loan(s) and cannot be removed",
                open_loans
            )));
        }

        let result = sqlx::query("UPDATE books SET active = FALSE, updated_at = NOW() WHERE id = $1 AND active")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }
}
