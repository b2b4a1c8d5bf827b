//! Driving port for the horse activity log.

use async_trait::async_trait;

use crate::domain::{ActivityDraft, Error, HorseActivity, HorseActivityId, HorseId};

/// Domain use-case port for horse activities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HorseActivityService: Send + Sync {
    async fn list(&self, horse_id: Option<HorseId>) -> Result<Vec<HorseActivity>, Error>;

    async fn get(&self, id: HorseActivityId) -> Result<HorseActivity, Error>;

    async fn create(&self, horse_id: HorseId, draft: ActivityDraft)
    -> Result<HorseActivity, Error>;

    async fn update(
        &self,
        id: HorseActivityId,
        horse_id: HorseId,
        draft: ActivityDraft,
    ) -> Result<HorseActivity, Error>;

    async fn delete(&self, id: HorseActivityId) -> Result<HorseActivity, Error>;
}
