//! Business logic services

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod lookup;
pub mod people;
pub mod reservations;
pub mod stats;

use crate::{
    config::{AuthConfig, LibraryConfig, LookupConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub people: people::PeopleService,
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
    pub lookup: lookup::LookupService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        library_config: LibraryConfig,
        lookup_config: LookupConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            people: people::PeopleService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), library_config.clone()),
            reservations: reservations::ReservationsService::new(repository.clone(), library_config),
            lookup: lookup::LookupService::new(lookup_config)?,
            stats: stats::StatsService::new(repository),
        })
    }
}
