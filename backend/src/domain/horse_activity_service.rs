//! Horse activity log domain service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    HorseActivityRepository, HorseActivityRepositoryError, HorseActivityService,
};
use crate::domain::{ActivityDraft, ActivityEntry, Error, HorseActivity, HorseActivityId, HorseId};

fn map_repository_error(error: HorseActivityRepositoryError) -> Error {
    match error {
        HorseActivityRepositoryError::Connection { message } => Error::service_unavailable(
            format!("horse activity repository unavailable: {message}"),
        ),
        HorseActivityRepositoryError::Query { message } => {
            Error::internal(format!("horse activity repository error: {message}"))
        }
        HorseActivityRepositoryError::MissingHorse => Error::not_found("horse not found"),
    }
}

fn not_found(id: HorseActivityId) -> Error {
    Error::not_found(format!("horse activity {id} not found"))
}

fn validate(horse_id: HorseId, draft: ActivityDraft) -> Result<ActivityEntry, Error> {
    ActivityEntry::new(horse_id, draft)
        .map_err(|err| Error::invalid_field(err.field(), err.to_string()))
}

/// Activity log service implementing the [`HorseActivityService`] port.
#[derive(Clone)]
pub struct HorseActivityServiceImpl<R> {
    activity_repo: Arc<R>,
}

impl<R> HorseActivityServiceImpl<R> {
    /// Create a new service with the activity repository.
    pub fn new(activity_repo: Arc<R>) -> Self {
        Self { activity_repo }
    }
}

#[async_trait]
impl<R> HorseActivityService for HorseActivityServiceImpl<R>
where
    R: HorseActivityRepository,
{
    async fn list(&self, horse_id: Option<HorseId>) -> Result<Vec<HorseActivity>, Error> {
        self.activity_repo
            .list(horse_id)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, id: HorseActivityId) -> Result<HorseActivity, Error> {
        self.activity_repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn create(
        &self,
        horse_id: HorseId,
        draft: ActivityDraft,
    ) -> Result<HorseActivity, Error> {
        let entry = validate(horse_id, draft)?;
        self.activity_repo
            .create(&entry)
            .await
            .map_err(map_repository_error)
    }

    async fn update(
        &self,
        id: HorseActivityId,
        horse_id: HorseId,
        draft: ActivityDraft,
    ) -> Result<HorseActivity, Error> {
        let entry = validate(horse_id, draft)?;
        self.activity_repo
            .update(id, &entry)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: HorseActivityId) -> Result<HorseActivity, Error> {
        self.activity_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockHorseActivityRepository;

    #[rstest]
    #[tokio::test]
    async fn unknown_horse_is_not_found() {
        let mut repo = MockHorseActivityRepository::new();
        repo.expect_create()
            .return_once(|_| Err(HorseActivityRepositoryError::missing_horse()));

        let err = HorseActivityServiceImpl::new(Arc::new(repo))
            .create(HorseId::random(), ActivityDraft::default())
            .await
            .expect_err("unknown horse");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn non_positive_duration_is_rejected() {
        let mut repo = MockHorseActivityRepository::new();
        repo.expect_create().never();
        let draft = ActivityDraft {
            duration_minutes: Some(0),
            ..ActivityDraft::default()
        };

        let err = HorseActivityServiceImpl::new(Arc::new(repo))
            .create(HorseId::random(), draft)
            .await
            .expect_err("zero duration");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
