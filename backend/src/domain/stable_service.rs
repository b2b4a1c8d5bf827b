//! Stable domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{StableRepository, StableRepositoryError, StableService};
use crate::domain::{Error, Stable, StableDraft, StableId, StableProfile};

fn map_repository_error(error: StableRepositoryError) -> Error {
    match error {
        StableRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("stable repository unavailable: {message}"))
        }
        StableRepositoryError::Query { message } => {
            Error::internal(format!("stable repository error: {message}"))
        }
        StableRepositoryError::Conflict { message } => Error::conflict(message)
            .with_details(json!({ "code": "duplicate_stable_name", "field": "fullName" })),
        StableRepositoryError::Rule { rule } => {
            Error::conflict(rule.to_string()).with_details(json!({ "code": rule.code() }))
        }
    }
}

fn not_found(id: StableId) -> Error {
    Error::not_found(format!("stable {id} not found"))
}

fn validate(draft: StableDraft) -> Result<StableProfile, Error> {
    StableProfile::new(draft).map_err(|err| Error::invalid_field(err.field(), err.to_string()))
}

/// Stable service implementing the [`StableService`] driving port.
#[derive(Clone)]
pub struct StableServiceImpl<R> {
    stable_repo: Arc<R>,
}

impl<R> StableServiceImpl<R> {
    /// Create a new service with the stable repository.
    pub fn new(stable_repo: Arc<R>) -> Self {
        Self { stable_repo }
    }
}

#[async_trait]
impl<R> StableService for StableServiceImpl<R>
where
    R: StableRepository,
{
    async fn list(&self) -> Result<Vec<Stable>, Error> {
        self.stable_repo.list().await.map_err(map_repository_error)
    }

    async fn get(&self, id: StableId) -> Result<Stable, Error> {
        self.stable_repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, draft: StableDraft) -> Result<Stable, Error> {
        let profile = validate(draft)?;
        let stable = self
            .stable_repo
            .create(&profile)
            .await
            .map_err(map_repository_error)?;
        info!(stable_id = %stable.id, "created stable");
        Ok(stable)
    }

    async fn update(&self, id: StableId, draft: StableDraft) -> Result<Stable, Error> {
        let profile = validate(draft)?;
        self.stable_repo
            .update(id, &profile)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: StableId) -> Result<Stable, Error> {
        let stable = self
            .stable_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;
        info!(stable_id = %id, detached = stable.stall_ids.len(), "deleted stable");
        Ok(stable)
    }
}

#[cfg(test)]
#[path = "stable_service_tests.rs"]
mod tests;
