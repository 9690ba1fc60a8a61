//! Dashboard statistics service

use sqlx::Row;

use crate::{
    api::stats::{PopularBook, StatsResponse},
    error::AppResult,
    models::loan::LoanQuery,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Gather the dashboard counters in one pass
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        let totals = sqlx::query(
            r#"
            SELECT COUNT(*) AS total_books,
                   COALESCE(SUM(copies_total), 0)::bigint AS total_copies
            FROM books WHERE active
            "#,
        )
        .fetch_one(pool)
        .await?;

        let total_books: i64 = totals.get("total_books");
        let total_copies: i64 = totals.get("total_copies");

        let active_loans = self.repository.loans.count_active().await?;
        let overdue_loans = self.repository.loans.count_overdue().await?;
        let active_reservations = self.repository.reservations.count_active().await?;

        let popular_rows = sqlx::query(
            r#"
            SELECT b.title, b.author, COUNT(l.id) AS loan_count
            FROM loans l
            JOIN books b ON l.book_id = b.id
            GROUP BY b.id, b.title, b.author
            ORDER BY loan_count DESC, b.title
            LIMIT 5
            "#,
        )
        .fetch_all(pool)
        .await?;

        let popular_books = popular_rows
            .iter()
            .map(|row| PopularBook {
                title: row.get("title"),
                author: row.get("author"),
                loan_count: row.get("loan_count"),
            })
            .collect();

        let recent_loans = self
            .repository
            .loans
            .list(&LoanQuery {
                search: None,
                status: None,
                person_id: None,
                book_id: None,
                page: Some(1),
                per_page: Some(5),
            })
            .await?;

        Ok(StatsResponse {
            total_books,
            total_copies,
            active_loans,
            overdue_loans,
            copies_available: (total_copies - active_loans).max(0),
            active_reservations,
            popular_books,
            recent_loans,
        })
    }
}
