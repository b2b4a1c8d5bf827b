//! Reqwest-backed OpenWeatherMap forecast adapter.
//!
//! Owns transport details only: query parameters, timeout and status
//! mapping, and decoding into domain forecast slots. Slot selection lives in
//! the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::ForecastResponseDto;
use crate::domain::ForecastSlot;
use crate::domain::ports::{WeatherSource, WeatherSourceError};

/// Forecast endpoint used when no override is configured.
pub const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
/// Five days of three-hour slots.
const SLOT_COUNT: &str = "40";

/// Weather source calling the OpenWeatherMap forecast endpoint.
pub struct OpenWeatherSource {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl OpenWeatherSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: Zeroizing::new(api_key.into()),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn forecast(&self, location: &str) -> Result<Vec<ForecastSlot>, WeatherSourceError> {
        debug!(location, "requesting forecast");
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("cnt", SLOT_COUNT),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_slots(body.as_ref())
    }
}

fn parse_slots(body: &[u8]) -> Result<Vec<ForecastSlot>, WeatherSourceError> {
    let decoded: ForecastResponseDto = serde_json::from_slice(body).map_err(|error| {
        WeatherSourceError::decode(format!("invalid forecast JSON payload: {error}"))
    })?;
    decoded.into_slots().map_err(WeatherSourceError::decode)
}

fn map_transport_error(error: reqwest::Error) -> WeatherSourceError {
    // Drop the URL so the API key never reaches logs or responses.
    WeatherSourceError::transport(error.without_url().to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> WeatherSourceError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview: String = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    WeatherSourceError::status(status.as_u16(), preview)
}
