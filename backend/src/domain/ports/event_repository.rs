//! Port for schedule event persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Event, EventDetails, EventId, EventRange};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Events on `date`, ordered by hour.
    async fn list_on(&self, date: NaiveDate) -> Result<Vec<Event>, EventRepositoryError>;

    /// Events within `range`, ordered by date then hour.
    async fn list_between(&self, range: EventRange) -> Result<Vec<Event>, EventRepositoryError>;

    async fn find(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    async fn create(&self, details: &EventDetails) -> Result<Event, EventRepositoryError>;

    /// Delete the event; `false` when it did not exist.
    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError>;
}
