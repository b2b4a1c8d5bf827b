//! Port for staff persistence.

use async_trait::async_trait;

use crate::domain::{Staff, StaffId, StaffProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by staff repository adapters.
    pub enum StaffRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "staff repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "staff repository query failed: {message}",
        /// Another staff member already uses the e-mail.
        Conflict { message: String } => "staff member already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Staff>, StaffRepositoryError>;

    async fn find(&self, id: StaffId) -> Result<Option<Staff>, StaffRepositoryError>;

    async fn create(&self, profile: &StaffProfile) -> Result<Staff, StaffRepositoryError>;

    async fn update(
        &self,
        id: StaffId,
        profile: &StaffProfile,
    ) -> Result<Option<Staff>, StaffRepositoryError>;

    async fn delete(&self, id: StaffId) -> Result<Option<Staff>, StaffRepositoryError>;
}
