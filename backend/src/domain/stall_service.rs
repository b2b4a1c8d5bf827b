//! Stall domain service: stall records and horse placement.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{StallRepository, StallRepositoryError, StallService};
use crate::domain::{
    Error, HorseId, Stall, StallDraft, StallFilter, StallId, StallRuleError, StallSpec,
    initial_status,
};

fn rule_error(rule: StallRuleError) -> Error {
    match rule {
        StallRuleError::CannotMarkOccupied => Error::invalid_request(rule.to_string())
            .with_details(json!({ "code": rule.code(), "field": "status" })),
        _ => Error::conflict(rule.to_string()).with_details(json!({ "code": rule.code() })),
    }
}

fn map_repository_error(id: Option<StallId>, error: StallRepositoryError) -> Error {
    match error {
        StallRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("stall repository unavailable: {message}"))
        }
        StallRepositoryError::Query { message } => {
            Error::internal(format!("stall repository error: {message}"))
        }
        StallRepositoryError::Conflict { message } => Error::conflict(message)
            .with_details(json!({ "code": "duplicate_stall_number", "field": "number" })),
        StallRepositoryError::MissingStall => match id {
            Some(id) => Error::not_found(format!("stall {id} not found")),
            None => Error::not_found("stall not found"),
        },
        StallRepositoryError::MissingHorse => Error::not_found("horse not found"),
        StallRepositoryError::MissingStable => Error::not_found("stable not found"),
        StallRepositoryError::Rule { rule } => rule_error(rule),
    }
}

fn validate(draft: &StallDraft) -> Result<StallSpec, Error> {
    StallSpec::from_draft(draft).map_err(|err| Error::invalid_field(err.field(), err.to_string()))
}

/// Stall service implementing the [`StallService`] driving port.
#[derive(Clone)]
pub struct StallServiceImpl<R> {
    stall_repo: Arc<R>,
}

impl<R> StallServiceImpl<R> {
    /// Create a new service with the stall repository.
    pub fn new(stall_repo: Arc<R>) -> Self {
        Self { stall_repo }
    }
}

#[async_trait]
impl<R> StallService for StallServiceImpl<R>
where
    R: StallRepository,
{
    async fn list(&self, filter: StallFilter) -> Result<Vec<Stall>, Error> {
        self.stall_repo
            .list(&filter)
            .await
            .map_err(|err| map_repository_error(None, err))
    }

    async fn get(&self, id: StallId) -> Result<Stall, Error> {
        self.stall_repo
            .find(id)
            .await
            .map_err(|err| map_repository_error(Some(id), err))?
            .ok_or_else(|| Error::not_found(format!("stall {id} not found")))
    }

    async fn create(&self, draft: StallDraft) -> Result<Stall, Error> {
        let spec = validate(&draft)?;
        let status = initial_status(draft.status).map_err(rule_error)?;
        let stall = self
            .stall_repo
            .create(&spec, status)
            .await
            .map_err(|err| map_repository_error(None, err))?;
        info!(stall_id = %stall.id, stable_id = ?stall.spec.stable_id(), "created stall");
        Ok(stall)
    }

    async fn update(&self, id: StallId, draft: StallDraft) -> Result<Stall, Error> {
        let spec = validate(&draft)?;
        self.stall_repo
            .update(id, &spec, draft.status)
            .await
            .map_err(|err| map_repository_error(Some(id), err))
    }

    async fn delete(&self, id: StallId) -> Result<Stall, Error> {
        let stall = self
            .stall_repo
            .delete(id)
            .await
            .map_err(|err| map_repository_error(Some(id), err))?;
        info!(stall_id = %id, "deleted stall");
        Ok(stall)
    }

    async fn assign(&self, id: StallId, horse_id: HorseId) -> Result<Stall, Error> {
        let stall = self
            .stall_repo
            .assign(id, horse_id)
            .await
            .map_err(|err| map_repository_error(Some(id), err))?;
        info!(stall_id = %id, horse_id = %horse_id, "assigned horse to stall");
        Ok(stall)
    }

    async fn release(&self, id: StallId) -> Result<Stall, Error> {
        let stall = self
            .stall_repo
            .release(id)
            .await
            .map_err(|err| map_repository_error(Some(id), err))?;
        info!(stall_id = %id, "released stall");
        Ok(stall)
    }
}

#[cfg(test)]
#[path = "stall_service_tests.rs"]
mod tests;
