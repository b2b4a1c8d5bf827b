//! Port abstraction for user account persistence and its errors.

use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column (email, username, Google id) already holds the value.
        Conflict { message: String } => "user already exists: {message}",
    }
}

/// Port for reading and writing user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, assigning its identifier and timestamps.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised e-mail.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by linked Google account id.
    async fn find_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Attach a Google account id to an existing user.
    async fn link_google_id(
        &self,
        id: UserId,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError>;
}
