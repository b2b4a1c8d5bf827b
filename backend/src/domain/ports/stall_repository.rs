//! Port for stall persistence and the assignment workflow.

use async_trait::async_trait;

use crate::domain::{
    HorseId, Stall, StallFilter, StallId, StallRuleError, StallSpec, StallStatus,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by stall repository adapters.
    pub enum StallRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "stall repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "stall repository query failed: {message}",
        /// Stall number already used within the stable.
        Conflict { message: String } => "stall conflicts with an existing stall: {message}",
        /// The stall does not exist.
        MissingStall => "stall not found",
        /// The referenced horse does not exist.
        MissingHorse => "horse not found",
        /// The referenced stable does not exist.
        MissingStable => "stable not found",
        /// The change breaks a stall rule.
        Rule { rule: StallRuleError } => "{rule}",
    }
}

/// Port for stalls.
///
/// Every mutating method runs atomically: the stall row (and, for moves, the
/// target stable) is locked, the stall rules are checked against the locked
/// state, and the write is committed or nothing changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StallRepository: Send + Sync {
    async fn list(&self, filter: &StallFilter) -> Result<Vec<Stall>, StallRepositoryError>;

    async fn find(&self, id: StallId) -> Result<Option<Stall>, StallRepositoryError>;

    /// Insert a stall with the given initial status after checking that its
    /// stable exists and has room.
    async fn create(
        &self,
        spec: &StallSpec,
        status: StallStatus,
    ) -> Result<Stall, StallRepositoryError>;

    /// Replace the editable fields and resolve the requested status with
    /// [`crate::domain::resolve_status`].
    async fn update(
        &self,
        id: StallId,
        spec: &StallSpec,
        requested_status: Option<StallStatus>,
    ) -> Result<Stall, StallRepositoryError>;

    /// Delete an empty stall. Returns the stall as it was before deletion.
    async fn delete(&self, id: StallId) -> Result<Stall, StallRepositoryError>;

    /// Place `horse_id` in the stall, releasing any other stall it held.
    async fn assign(&self, id: StallId, horse_id: HorseId) -> Result<Stall, StallRepositoryError>;

    /// Empty the stall. Releasing an empty stall succeeds unchanged.
    async fn release(&self, id: StallId) -> Result<Stall, StallRepositoryError>;
}
