//! Reservation management endpoints

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
    models::reservation::{CreateReservation, ReservationDetails, ReservationQuery},
};

use super::AuthenticatedStaff;

/// Reservation response with a status message
#[derive(Serialize, ToSchema)]
pub struct ReservationResponse {
    pub reservation: ReservationDetails,
    pub message: String,
}

/// List reservations, newest first
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(ReservationQuery),
    responses(
        (status = 200, description = "Reservations with derived status", body = Vec<ReservationDetails>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<ReservationQuery>,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    let reservations = state.services.reservations.list(&query).await?;
    Ok(Json(reservations))
}

/// Reserve a book for a person
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 404, description = "Book or person not found"),
        (status = 409, description = "Person already has an active reservation for this book")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    let reservation = state.services.reservations.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse {
            message: format!(
                "Reservation created, expires {}",
                reservation.expires_at.date_naive()
            ),
            reservation,
        }),
    ))
}

/// Mark a reservation fulfilled
#[utoipa::path(
    post,
    path = "/reservations/{id}/fulfill",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation fulfilled", body = ReservationResponse),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is not active")
    )
)]
pub async fn fulfill_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let (reservation, requires_followup_loan) = state.services.reservations.fulfill(id).await?;

    let message = if requires_followup_loan {
        "Reservation fulfilled; check the book out to complete the handover".to_string()
    } else {
        "Reservation fulfilled".to_string()
    };

    Ok(Json(ReservationResponse { message, reservation }))
}

/// Cancel a reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = ReservationResponse),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Reservation is not active")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = state.services.reservations.cancel(id).await?;

    Ok(Json(ReservationResponse {
        message: "Reservation cancelled".to_string(),
        reservation,
    }))
}
