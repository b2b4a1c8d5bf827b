//! Driving port for stables.

use async_trait::async_trait;

use crate::domain::{Error, Stable, StableDraft, StableId};

/// Domain use-case port for stables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StableService: Send + Sync {
    async fn list(&self) -> Result<Vec<Stable>, Error>;

    async fn get(&self, id: StableId) -> Result<Stable, Error>;

    async fn create(&self, draft: StableDraft) -> Result<Stable, Error>;

    async fn update(&self, id: StableId, draft: StableDraft) -> Result<Stable, Error>;

    async fn delete(&self, id: StableId) -> Result<Stable, Error>;
}
