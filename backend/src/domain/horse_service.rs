//! Horse domain service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{HorseRepository, HorseRepositoryError, HorseService};
use crate::domain::{Error, Horse, HorseDraft, HorseFilter, HorseId, HorseProfile};

fn map_repository_error(error: HorseRepositoryError) -> Error {
    match error {
        HorseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("horse repository unavailable: {message}"))
        }
        HorseRepositoryError::Query { message } => {
            Error::internal(format!("horse repository error: {message}"))
        }
    }
}

fn not_found(id: HorseId) -> Error {
    Error::not_found(format!("horse {id} not found"))
}

fn validate(draft: HorseDraft) -> Result<HorseProfile, Error> {
    HorseProfile::new(draft).map_err(|err| Error::invalid_field(err.field(), err.to_string()))
}

/// Horse service implementing the [`HorseService`] driving port.
#[derive(Clone)]
pub struct HorseServiceImpl<R> {
    horse_repo: Arc<R>,
}

impl<R> HorseServiceImpl<R> {
    /// Create a new service with the horse repository.
    pub fn new(horse_repo: Arc<R>) -> Self {
        Self { horse_repo }
    }
}

#[async_trait]
impl<R> HorseService for HorseServiceImpl<R>
where
    R: HorseRepository,
{
    async fn list(&self, filter: HorseFilter) -> Result<Vec<Horse>, Error> {
        self.horse_repo
            .list(&filter)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, id: HorseId) -> Result<Horse, Error> {
        self.horse_repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, draft: HorseDraft) -> Result<Horse, Error> {
        let profile = validate(draft)?;
        let horse = self
            .horse_repo
            .create(&profile)
            .await
            .map_err(map_repository_error)?;
        info!(horse_id = %horse.id, "created horse");
        Ok(horse)
    }

    async fn update(&self, id: HorseId, draft: HorseDraft) -> Result<Horse, Error> {
        let profile = validate(draft)?;
        self.horse_repo
            .update(id, &profile)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: HorseId) -> Result<Horse, Error> {
        let horse = self
            .horse_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;
        info!(horse_id = %id, released_stall = ?horse.stall_id(), "deleted horse");
        Ok(horse)
    }
}

#[cfg(test)]
#[path = "horse_service_tests.rs"]
mod tests;
