//! OpenWeatherMap outbound adapter for the `WeatherSource` port.

mod dto;
mod http_source;

pub use http_source::{DEFAULT_FORECAST_URL, OpenWeatherSource};
