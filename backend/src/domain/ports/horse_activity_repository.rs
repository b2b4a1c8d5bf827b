//! Port for the horse activity log.

use async_trait::async_trait;

use crate::domain::{ActivityEntry, HorseActivity, HorseActivityId, HorseId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by horse activity repository adapters.
    pub enum HorseActivityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "horse activity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "horse activity repository query failed: {message}",
        /// The referenced horse does not exist.
        MissingHorse => "horse not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HorseActivityRepository: Send + Sync {
    /// Activities, optionally for one horse, most recent first.
    async fn list(
        &self,
        horse_id: Option<HorseId>,
    ) -> Result<Vec<HorseActivity>, HorseActivityRepositoryError>;

    async fn find(
        &self,
        id: HorseActivityId,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError>;

    async fn create(
        &self,
        entry: &ActivityEntry,
    ) -> Result<HorseActivity, HorseActivityRepositoryError>;

    async fn update(
        &self,
        id: HorseActivityId,
        entry: &ActivityEntry,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError>;

    async fn delete(
        &self,
        id: HorseActivityId,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError>;
}
