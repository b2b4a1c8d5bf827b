//! Driving port for staff records.

use async_trait::async_trait;

use crate::domain::{Error, Staff, StaffDraft, StaffId};

/// Domain use-case port for staff members.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffService: Send + Sync {
    async fn list(&self) -> Result<Vec<Staff>, Error>;

    async fn get(&self, id: StaffId) -> Result<Staff, Error>;

    async fn create(&self, draft: StaffDraft) -> Result<Staff, Error>;

    async fn update(&self, id: StaffId, draft: StaffDraft) -> Result<Staff, Error>;

    async fn delete(&self, id: StaffId) -> Result<Staff, Error>;
}
