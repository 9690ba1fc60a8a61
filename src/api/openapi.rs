//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, loans, people, reservations, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sabedoria API",
        version = "0.3.0",
        description = "Church library administration REST API",
        contact(name = "Sabedoria Team")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_categories,
        books::lookup_isbn,
        // People
        people::list_people,
        people::get_person,
        // Loans
        loans::list_loans,
        loans::create_loan,
        loans::return_loan,
        loans::renew_loan,
        // Reservations
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::fulfill_reservation,
        reservations::cancel_reservation,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::BookAvailability,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            books::BookListResponse,
            crate::services::lookup::IsbnMetadata,
            // People
            crate::models::person::Person,
            crate::models::person::PersonShort,
            people::PersonListResponse,
            // Loans
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanStatus,
            crate::models::loan::CreateLoan,
            loans::LoanResponse,
            // Reservations
            crate::models::reservation::ReservationDetails,
            crate::models::reservation::ReservationStatus,
            crate::models::reservation::CreateReservation,
            reservations::ReservationResponse,
            // Auth
            crate::models::staff::StaffRole,
            crate::models::staff::StaffProfile,
            crate::models::staff::LoginRequest,
            crate::models::staff::LoginResponse,
            // Stats
            stats::StatsResponse,
            stats::PopularBook,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Staff authentication"),
        (name = "books", description = "Catalog management"),
        (name = "people", description = "Congregation members"),
        (name = "loans", description = "Loan management"),
        (name = "reservations", description = "Reservation management"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
