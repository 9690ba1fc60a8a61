//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::book::BookShort;
use super::person::PersonShort;

/// Stored loan status. Closed set: "Overdue" is a derived display label and is
/// never persisted (see [`crate::lifecycle::status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Renewed,
    Returned,
}

impl LoanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Renewed => "Renewed",
            LoanStatus::Returned => "Returned",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: Uuid,
    pub book_id: Uuid,
    pub person_id: Uuid,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub renewal_count: i16,
    pub notes: Option<String>,
}

/// Loan with joined book/person and derived status for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDetails {
    pub id: Uuid,
    pub book: BookShort,
    pub person: PersonShort,
    pub loan_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub renewal_count: i16,
    pub notes: Option<String>,
    /// Display label ("Active", "Renewed", "Returned" or derived "Overdue")
    pub status_label: String,
    pub is_late: bool,
    pub late_days: i64,
}

/// Create loan (checkout) request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub book_id: Uuid,
    pub person_id: Uuid,
    pub notes: Option<String>,
}

/// Status filter for loan lists. `Overdue` is resolved against the clock,
/// not against a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatusFilter {
    Active,
    Renewed,
    Returned,
    Overdue,
}

/// Loan query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    /// Free text over book title, author and borrower name
    pub search: Option<String>,
    pub status: Option<LoanStatusFilter>,
    pub person_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
