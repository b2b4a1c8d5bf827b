//! Port for horse persistence.

use async_trait::async_trait;

use crate::domain::{Horse, HorseFilter, HorseId, HorseProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by horse repository adapters.
    pub enum HorseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "horse repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "horse repository query failed: {message}",
    }
}

/// Port for horse records and their stall placement.
///
/// Reads populate [`Horse::placement`] from the stall currently holding the
/// horse.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HorseRepository: Send + Sync {
    async fn list(&self, filter: &HorseFilter) -> Result<Vec<Horse>, HorseRepositoryError>;

    async fn find(&self, id: HorseId) -> Result<Option<Horse>, HorseRepositoryError>;

    async fn create(&self, profile: &HorseProfile) -> Result<Horse, HorseRepositoryError>;

    /// Replace the editable fields; `None` when the horse does not exist.
    async fn update(
        &self,
        id: HorseId,
        profile: &HorseProfile,
    ) -> Result<Option<Horse>, HorseRepositoryError>;

    /// Delete the horse, releasing any stall it occupies in the same atomic
    /// step. Returns the horse as it was before deletion.
    async fn delete(&self, id: HorseId) -> Result<Option<Horse>, HorseRepositoryError>;
}
