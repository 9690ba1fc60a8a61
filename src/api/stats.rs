//! Dashboard statistics endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::loan::LoanDetails};

use super::AuthenticatedStaff;

/// A frequently loaned title
#[derive(Serialize, ToSchema)]
pub struct PopularBook {
    pub title: String,
    pub author: String,
    pub loan_count: i64,
}

/// Aggregated counts for the dashboard
#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_books: i64,
    pub total_copies: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    pub copies_available: i64,
    pub active_reservations: i64,
    pub popular_books: Vec<PopularBook>,
    pub recent_loans: Vec<LoanDetails>,
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Library statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
