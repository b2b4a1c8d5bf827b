//! Schedule domain service with per-event forecasts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    EventRepository, EventRepositoryError, EventService, WeatherSource, WeatherSourceError,
};
use crate::domain::{
    Error, Event, EventDetails, EventDraft, EventId, EventRange, FORECAST_HORIZON_DAYS,
    WeatherOutlook, WeatherReport, days_until, provider_location, select_slot,
};

fn map_repository_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventRepositoryError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
    }
}

fn map_weather_error(error: WeatherSourceError) -> Error {
    match error {
        WeatherSourceError::NotConfigured => {
            Error::service_unavailable("weather forecasts are not configured")
        }
        other => Error::service_unavailable(other.to_string()),
    }
}

fn not_found(id: EventId) -> Error {
    Error::not_found(format!("event {id} not found"))
}

/// Event service implementing the [`EventService`] driving port.
#[derive(Clone)]
pub struct EventServiceImpl<R> {
    event_repo: Arc<R>,
    weather: Arc<dyn WeatherSource>,
    clock: Arc<dyn Clock>,
}

impl<R> EventServiceImpl<R> {
    /// Create a new service from its collaborators.
    pub fn new(event_repo: Arc<R>, weather: Arc<dyn WeatherSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            event_repo,
            weather,
            clock,
        }
    }
}

#[async_trait]
impl<R> EventService for EventServiceImpl<R>
where
    R: EventRepository,
{
    async fn on_date(&self, date: NaiveDate) -> Result<Vec<Event>, Error> {
        self.event_repo
            .list_on(date)
            .await
            .map_err(map_repository_error)
    }

    async fn between(&self, range: EventRange) -> Result<Vec<Event>, Error> {
        self.event_repo
            .list_between(range)
            .await
            .map_err(map_repository_error)
    }

    async fn create(&self, draft: EventDraft) -> Result<Event, Error> {
        let details = EventDetails::new(draft)
            .map_err(|err| Error::invalid_field(err.field(), err.to_string()))?;
        let event = self
            .event_repo
            .create(&details)
            .await
            .map_err(map_repository_error)?;
        info!(event_id = %event.id, date = %event.details.date(), "created event");
        Ok(event)
    }

    async fn delete(&self, id: EventId) -> Result<(), Error> {
        let removed = self
            .event_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if removed { Ok(()) } else { Err(not_found(id)) }
    }

    async fn weather(&self, id: EventId) -> Result<WeatherOutlook, Error> {
        let event = self
            .event_repo
            .find(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;

        let today = self.clock.utc().date_naive();
        let days = days_until(event.details.date(), today);
        if days > FORECAST_HORIZON_DAYS {
            debug!(event_id = %id, days, "event beyond forecast horizon");
            return Ok(WeatherOutlook::NotYetAvailable {
                days_until_available: days - FORECAST_HORIZON_DAYS,
            });
        }

        let location = provider_location(event.details.location());
        let slots = self
            .weather
            .forecast(location)
            .await
            .map_err(map_weather_error)?;
        let window = event.training_window();
        let slot = select_slot(&slots, &window)
            .ok_or_else(|| Error::not_found(format!("no forecast for {location}")))?;
        Ok(WeatherOutlook::Available(WeatherReport::from_slot(
            slot, &window, location,
        )))
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
