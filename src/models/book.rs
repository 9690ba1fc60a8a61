//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Availability of a book, derived from its open loans and reservations.
///
/// Never stored: the authoritative state is the set of open Loan/Reservation rows
/// plus the operator-set maintenance flag. See [`crate::lifecycle::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookAvailability {
    Available,
    Loaned,
    Reserved,
    UnderMaintenance,
}

impl BookAvailability {
    pub fn label(&self) -> &'static str {
        match self {
            BookAvailability::Available => "Available",
            BookAvailability::Loaned => "Loaned",
            BookAvailability::Reserved => "Reserved",
            BookAvailability::UnderMaintenance => "Under Maintenance",
        }
    }

    /// Wire name, matching the serde representation
    pub fn code(&self) -> &'static str {
        match self {
            BookAvailability::Available => "available",
            BookAvailability::Loaned => "loaned",
            BookAvailability::Reserved => "reserved",
            BookAvailability::UnderMaintenance => "under_maintenance",
        }
    }
}

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub synopsis: Option<String>,
    pub cover_image_url: Option<String>,
    pub publication_year: Option<i16>,
    pub page_count: Option<i16>,
    pub copies_total: i16,
    pub under_maintenance: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book row with the derived counts the list and detail views need
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub book: Book,
    pub copies_on_loan: i64,
    pub active_reservations: i64,
}

/// Book with derived availability, as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub copies_on_loan: i64,
    pub copies_available: i64,
    pub active_reservations: i64,
    pub availability: BookAvailability,
}

/// Short book representation for joined loan/reservation lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub cover_image_url: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub synopsis: Option<String>,
    pub cover_image_url: Option<String>,
    pub publication_year: Option<i16>,
    pub page_count: Option<i16>,
    #[validate(range(min = 1, message = "At least one copy is required"))]
    pub copies_total: Option<i16>,
}

/// Update book request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub synopsis: Option<String>,
    pub cover_image_url: Option<String>,
    pub publication_year: Option<i16>,
    pub page_count: Option<i16>,
    #[validate(range(min = 1, message = "At least one copy is required"))]
    pub copies_total: Option<i16>,
    pub under_maintenance: Option<bool>,
}

/// Book query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Free text over title, author, ISBN and publisher
    pub search: Option<String>,
    pub category: Option<String>,
    /// Filter on derived availability
    pub availability: Option<BookAvailability>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

static ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{9}[\dXx]|\d{13})$").unwrap());

/// Strip separators and validate an ISBN-10/ISBN-13 string.
pub fn normalize_isbn(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if ISBN_RE.is_match(&cleaned) {
        Some(cleaned.to_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_isbn_13() {
        assert_eq!(
            normalize_isbn("978-85-7325-408-6").as_deref(),
            Some("9788573254086")
        );
    }

    #[test]
    fn test_normalize_isbn_10_with_check_char() {
        assert_eq!(normalize_isbn("0 19 852663 x").as_deref(), Some("019852663X"));
    }

    #[test]
    fn test_normalize_isbn_rejects_garbage() {
        assert!(normalize_isbn("not-an-isbn").is_none());
        assert!(normalize_isbn("12345").is_none());
    }
}
