//! Port for the five-day forecast provider.

use async_trait::async_trait;

use crate::domain::ForecastSlot;

use super::define_port_error;

define_port_error! {
    /// Errors raised by weather source adapters.
    pub enum WeatherSourceError {
        /// No API key is configured.
        NotConfigured => "weather forecasts are not configured",
        /// The request could not be completed.
        Transport { message: String } => "weather provider request failed: {message}",
        /// The provider answered with a failure status.
        Status { status: u16, message: String } =>
            "weather provider responded with {status}: {message}",
        /// The provider payload could not be decoded.
        Decode { message: String } => "weather provider payload invalid: {message}",
    }
}

/// Port for fetching forecast slots for a provider location query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Slots for `location` (such as `Warsaw,PL`) in provider order.
    async fn forecast(&self, location: &str) -> Result<Vec<ForecastSlot>, WeatherSourceError>;
}

/// Weather source used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledWeatherSource;

#[async_trait]
impl WeatherSource for DisabledWeatherSource {
    async fn forecast(&self, _location: &str) -> Result<Vec<ForecastSlot>, WeatherSourceError> {
        Err(WeatherSourceError::not_configured())
    }
}
