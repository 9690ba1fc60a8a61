//! Reservation model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::book::BookShort;
use super::person::PersonShort;

/// Stored reservation status. Our write paths never produce `Expired`; it exists
/// for rows imported from the previous system and is treated as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Fulfilled,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "Active",
            ReservationStatus::Fulfilled => "Fulfilled",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reservation model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub book_id: Uuid,
    pub person_id: Uuid,
    pub reserved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

/// Reservation with joined book/person and derived status for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationDetails {
    pub id: Uuid,
    pub book: BookShort,
    pub person: PersonShort,
    pub reserved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: ReservationStatus,
    /// Display label (stored label or derived "Expired")
    pub status_label: String,
    pub is_expired: bool,
    /// Days until expiry, ceiling; non-positive means already expired
    pub days_remaining: i64,
}

/// Create reservation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservation {
    pub book_id: Uuid,
    pub person_id: Uuid,
}

/// Status filter for reservation lists. `Expired` matches stored-active rows
/// whose expiry has passed, plus legacy stored-expired rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatusFilter {
    Active,
    Fulfilled,
    Cancelled,
    Expired,
}

/// Reservation query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ReservationQuery {
    /// Free text over book title, author and person name
    pub search: Option<String>,
    pub status: Option<ReservationStatusFilter>,
    pub person_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
