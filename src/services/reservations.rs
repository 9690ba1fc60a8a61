//! Reservation management service

use uuid::Uuid;

use crate::{
    config::LibraryConfig,
    error::AppResult,
    lifecycle::transitions::{apply_reservation_transition, ReservationAction},
    models::reservation::{CreateReservation, ReservationDetails, ReservationQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    config: LibraryConfig,
}

impl ReservationsService {
    pub fn new(repository: Repository, config: LibraryConfig) -> Self {
        Self { repository, config }
    }

    /// List reservations with joined book/person and derived display status
    pub async fn list(&self, query: &ReservationQuery) -> AppResult<Vec<ReservationDetails>> {
        self.repository.reservations.list(query).await
    }

    /// Place a reservation on a book
    pub async fn create(&self, reservation: CreateReservation) -> AppResult<ReservationDetails> {
        let created = self
            .repository
            .reservations
            .create(&reservation, self.config.hold_period_days)
            .await?;

        tracing::info!(
            "Reservation {} created: book {} for person {}, expires {}",
            created.id,
            created.book_id,
            created.person_id,
            created.expires_at
        );
        self.repository.reservations.get_details(created.id).await
    }

    /// Mark a reservation fulfilled. The follow-up loan is a separate staff
    /// action; the returned flag tells the caller to prompt for it.
    pub async fn fulfill(&self, id: Uuid) -> AppResult<(ReservationDetails, bool)> {
        let reservation = self.repository.reservations.get_by_id(id).await?;
        let update = apply_reservation_transition(&reservation, ReservationAction::Fulfill)?;
        self.repository.reservations.apply_update(id, &update).await?;

        tracing::info!("Reservation {} fulfilled (book {})", id, reservation.book_id);
        let details = self.repository.reservations.get_details(id).await?;
        Ok((details, update.requires_followup_loan))
    }

    /// Cancel a reservation
    pub async fn cancel(&self, id: Uuid) -> AppResult<ReservationDetails> {
        let reservation = self.repository.reservations.get_by_id(id).await?;
        let update = apply_reservation_transition(&reservation, ReservationAction::Cancel)?;
        self.repository.reservations.apply_update(id, &update).await?;

        tracing::info!("Reservation {} cancelled", id);
        self.repository.reservations.get_details(id).await
    }

    /// Count active reservations
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.reservations.count_active().await
    }
}
