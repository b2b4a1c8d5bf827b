//! Staff domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{StaffRepository, StaffRepositoryError, StaffService};
use crate::domain::{Error, Staff, StaffDraft, StaffId, StaffProfile};

fn map_repository_error(error: StaffRepositoryError) -> Error {
    match error {
        StaffRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("staff repository unavailable: {message}"))
        }
        StaffRepositoryError::Query { message } => {
            Error::internal(format!("staff repository error: {message}"))
        }
        StaffRepositoryError::Conflict { message } => Error::conflict(message)
            .with_details(json!({ "code": "duplicate_staff_email", "field": "email" })),
    }
}

fn not_found(id: StaffId) -> Error {
    Error::not_found(format!("staff member {id} not found"))
}

fn validate(draft: StaffDraft) -> Result<StaffProfile, Error> {
    StaffProfile::new(draft).map_err(|err| Error::invalid_field(err.field(), err.to_string()))
}

/// Staff service implementing the [`StaffService`] driving port.
#[derive(Clone)]
pub struct StaffServiceImpl<R> {
    staff_repo: Arc<R>,
}

impl<R> StaffServiceImpl<R> {
    /// Create a new service with the staff repository.
    pub fn new(staff_repo: Arc<R>) -> Self {
        Self { staff_repo }
    }
}

#[async_trait]
impl<R> StaffService for StaffServiceImpl<R>
where
    R: StaffRepository,
{
    async fn list(&self) -> Result<Vec<Staff>, Error> {
        self.staff_repo.list().await.map_err(map_repository_error)
    }

    async fn get(&self, id: StaffId) -> Result<Staff, Error> {
        self.staff_repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, draft: StaffDraft) -> Result<Staff, Error> {
        let profile = validate(draft)?;
        self.staff_repo
            .create(&profile)
            .await
            .map_err(map_repository_error)
    }

    async fn update(&self, id: StaffId, draft: StaffDraft) -> Result<Staff, Error> {
        let profile = validate(draft)?;
        self.staff_repo
            .update(id, &profile)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: StaffId) -> Result<Staff, Error> {
        self.staff_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}
