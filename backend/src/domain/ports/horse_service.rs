//! Driving port for horse records.

use async_trait::async_trait;

use crate::domain::{Error, Horse, HorseDraft, HorseFilter, HorseId};

/// Domain use-case port for horses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HorseService: Send + Sync {
    async fn list(&self, filter: HorseFilter) -> Result<Vec<Horse>, Error>;

    async fn get(&self, id: HorseId) -> Result<Horse, Error>;

    async fn create(&self, draft: HorseDraft) -> Result<Horse, Error>;

    async fn update(&self, id: HorseId, draft: HorseDraft) -> Result<Horse, Error>;

    /// Delete the horse and free its stall.
    async fn delete(&self, id: HorseId) -> Result<Horse, Error>;
}
