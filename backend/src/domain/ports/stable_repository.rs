//! Port for stable persistence.

use async_trait::async_trait;

use crate::domain::{Stable, StableId, StableProfile, StableRuleError};

use super::define_port_error;

define_port_error! {
    /// Errors raised by stable repository adapters.
    pub enum StableRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stable repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "stable repository query failed: {message}",
        /// Another stable already uses the name.
        Conflict { message: String } => "stable conflicts with an existing stable: {message}",
        /// The change breaks a stable rule.
        Rule { rule: StableRuleError } => "{rule}",
    }
}

/// Port for stables. Reads populate [`Stable::stall_ids`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StableRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Stable>, StableRepositoryError>;

    async fn find(&self, id: StableId) -> Result<Option<Stable>, StableRepositoryError>;

    async fn create(&self, profile: &StableProfile) -> Result<Stable, StableRepositoryError>;

    /// Replace the editable fields after checking the new capacity against
    /// the stalls already inside.
    async fn update(
        &self,
        id: StableId,
        profile: &StableProfile,
    ) -> Result<Option<Stable>, StableRepositoryError>;

    /// Delete the stable and detach its stalls.
    async fn delete(&self, id: StableId) -> Result<Option<Stable>, StableRepositoryError>;
}
