//! Driving port for stalls and horse placement.

use async_trait::async_trait;

use crate::domain::{Error, HorseId, Stall, StallDraft, StallFilter, StallId};

/// Domain use-case port for stalls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StallService: Send + Sync {
    async fn list(&self, filter: StallFilter) -> Result<Vec<Stall>, Error>;

    async fn get(&self, id: StallId) -> Result<Stall, Error>;

    async fn create(&self, draft: StallDraft) -> Result<Stall, Error>;

    async fn update(&self, id: StallId, draft: StallDraft) -> Result<Stall, Error>;

    async fn delete(&self, id: StallId) -> Result<Stall, Error>;

    /// Place a horse in the stall.
    async fn assign(&self, id: StallId, horse_id: HorseId) -> Result<Stall, Error>;

    /// Empty the stall.
    async fn release(&self, id: StallId) -> Result<Stall, Error>;
}
