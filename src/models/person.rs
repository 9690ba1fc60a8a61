//! Person (borrower) model
//!
//! People are owned by the wider congregation-management system; this server
//! only reads them for loan and reservation bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Person model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Person {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Short person representation for joined lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonShort {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

/// Person query parameters (API)
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PersonQuery {
    /// Free text over name and email
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
