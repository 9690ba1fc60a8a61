//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanDetails, LoanQuery},
};

use super::AuthenticatedStaff;

/// Loan response with a status message
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    pub loan: LoanDetails,
    pub message: String,
}

/// List loans, newest first
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(LoanQuery),
    responses(
        (status = 200, description = "Loans with derived status", body = Vec<LoanDetails>)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.list(&query).await?;
    Ok(Json(loans))
}

/// Check a book out to a person
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 404, description = "Book or person not found"),
        (status = 409, description = "No copies available or book under maintenance")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let loan = state.services.loans.checkout(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            message: format!("Book checked out, due {}", loan.due_date.date_naive()),
            loan,
        }),
    ))
}

/// Return a loaned book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Book returned", body = LoanResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(loan_id): Path<Uuid>,
) -> AppResult<Json<LoanResponse>> {
    let loan = state.services.loans.return_loan(loan_id).await?;

    Ok(Json(LoanResponse {
        message: "Book returned".to_string(),
        loan,
    }))
}

/// Renew a loan
#[utoipa::path(
    post,
    path = "/loans/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan renewed", body = LoanResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned or renewal limit reached")
    )
)]
pub async fn renew_loan(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(loan_id): Path<Uuid>,
) -> AppResult<Json<LoanResponse>> {
    let loan = state.services.loans.renew_loan(loan_id).await?;

    Ok(Json(LoanResponse {
        message: format!(
            "Loan renewed ({} renewal(s)), new due date {}",
            loan.renewal_count,
            loan.due_date.date_naive()
        ),
        loan,
    }))
}
