//! People endpoints (read-only)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::person::{Person, PersonQuery},
};

use super::AuthenticatedStaff;

/// Paginated people list response
#[derive(Serialize, ToSchema)]
pub struct PersonListResponse {
    pub people: Vec<Person>,
    pub total: i64,
}

/// List people
#[utoipa::path(
    get,
    path = "/people",
    tag = "people",
    security(("bearer_auth" = [])),
    params(PersonQuery),
    responses(
        (status = 200, description = "Matching people", body = PersonListResponse)
    )
)]
pub async fn list_people(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Query(query): Query<PersonQuery>,
) -> AppResult<Json<PersonListResponse>> {
    let (people, total) = state.services.people.list(&query).await?;
    Ok(Json(PersonListResponse { people, total }))
}

/// Get a person by ID
#[utoipa::path(
    get,
    path = "/people/{id}",
    tag = "people",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Person", body = Person),
        (status = 404, description = "Person not found")
    )
)]
pub async fn get_person(
    State(state): State<crate::AppState>,
    AuthenticatedStaff(_claims): AuthenticatedStaff,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Person>> {
    let person = state.services.people.get(id).await?;
    Ok(Json(person))
}
