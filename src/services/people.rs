//! People lookup service (read-only)

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::person::{Person, PersonQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct PeopleService {
    repository: Repository,
}

impl PeopleService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List people with optional search
    pub async fn list(&self, query: &PersonQuery) -> AppResult<(Vec<Person>, i64)> {
        self.repository.people.list(query).await
    }

    /// Get person by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Person> {
        self.repository.people.get_by_id(id).await
    }
}
