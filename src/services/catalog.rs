//! Catalog management service

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    lifecycle::status::derive_book_availability,
    models::book::{normalize_isbn, BookDetails, BookQuery, BookRow, CreateBook, UpdateBook},
    repository::Repository,
};

fn to_details(row: BookRow) -> BookDetails {
    let availability = derive_book_availability(
        row.book.under_maintenance,
        row.book.copies_total,
        row.copies_on_loan,
        row.active_reservations,
    );
    let copies_available = (i64::from(row.book.copies_total) - row.copies_on_loan).max(0);

    BookDetails {
        book: row.book,
        copies_on_loan: row.copies_on_loan,
        copies_available,
        active_reservations: row.active_reservations,
        availability,
    }
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<BookDetails>, i64)> {
        let (rows, total) = self.repository.books.search(query).await?;
        Ok((rows.into_iter().map(to_details).collect(), total))
    }

    /// Get book by ID with derived availability
    pub async fn get_book(&self, id: Uuid) -> AppResult<BookDetails> {
        let row = self.repository.books.get_by_id(id).await?;
        Ok(to_details(row))
    }

    /// Create a new book
    pub async fn create_book(&self, mut book: CreateBook) -> AppResult<BookDetails> {
        if let Some(ref raw) = book.isbn {
            book.isbn = Some(
                normalize_isbn(raw)
                    .ok_or_else(|| AppError::Validation(format!("Invalid ISBN: {}", raw)))?,
            );
        }

        let created = self.repository.books.create(&book).await?;
        tracing::info!("Book created: {} ({})", created.title, created.id);
        self.get_book(created.id).await
    }

    /// Update a book
    pub async fn update_book(&self, id: Uuid, mut update: UpdateBook) -> AppResult<BookDetails> {
        if let Some(ref raw) = update.isbn {
            update.isbn = Some(
                normalize_isbn(raw)
                    .ok_or_else(|| AppError::Validation(format!("Invalid ISBN: {}", raw)))?,
            );
        }

        self.repository.books.update(id, &update).await?;
        self.get_book(id).await
    }

    /// Soft-delete a book
    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.repository.books.soft_delete(id).await?;
        tracing::info!("Book removed from catalog: {}", id);
        Ok(())
    }

    /// Distinct categories for the catalog filter
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        self.repository.books.categories().await
    }
}
