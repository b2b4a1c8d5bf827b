//! Driving port for the schedule and event forecasts.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Error, Event, EventDraft, EventId, EventRange, WeatherOutlook};

/// Domain use-case port for scheduled events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventService: Send + Sync {
    async fn on_date(&self, date: NaiveDate) -> Result<Vec<Event>, Error>;

    async fn between(&self, range: EventRange) -> Result<Vec<Event>, Error>;

    async fn create(&self, draft: EventDraft) -> Result<Event, Error>;

    async fn delete(&self, id: EventId) -> Result<(), Error>;

    /// Forecast for the event's training window.
    async fn weather(&self, id: EventId) -> Result<WeatherOutlook, Error>;
}
