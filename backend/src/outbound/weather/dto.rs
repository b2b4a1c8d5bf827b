//! DTOs for the OpenWeatherMap 5 day / 3 hour forecast payload.

use chrono::DateTime;
use serde::Deserialize;

use crate::domain::ForecastSlot;

#[derive(Debug, Deserialize)]
pub(super) struct ForecastResponseDto {
    #[serde(default)]
    pub(super) list: Vec<ForecastEntryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ForecastEntryDto {
    pub(super) dt: i64,
    pub(super) main: MainDto,
    #[serde(default)]
    pub(super) weather: Vec<ConditionDto>,
    #[serde(default)]
    pub(super) clouds: Option<CloudsDto>,
    #[serde(default)]
    pub(super) wind: Option<WindDto>,
    pub(super) visibility: Option<i64>,
    #[serde(default)]
    pub(super) rain: Option<VolumeDto>,
    #[serde(default)]
    pub(super) snow: Option<VolumeDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MainDto {
    pub(super) temp: f64,
    pub(super) feels_like: f64,
    pub(super) temp_min: f64,
    pub(super) temp_max: f64,
    pub(super) pressure: i64,
    pub(super) humidity: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ConditionDto {
    pub(super) main: String,
    pub(super) description: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CloudsDto {
    pub(super) all: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct WindDto {
    pub(super) speed: f64,
    pub(super) deg: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VolumeDto {
    #[serde(rename = "3h", default)]
    pub(super) three_hours: f64,
}

impl ForecastResponseDto {
    pub(super) fn into_slots(self) -> Result<Vec<ForecastSlot>, String> {
        self.list
            .into_iter()
            .map(ForecastEntryDto::into_slot)
            .collect()
    }
}

impl ForecastEntryDto {
    fn into_slot(self) -> Result<ForecastSlot, String> {
        let time = DateTime::from_timestamp(self.dt, 0)
            .ok_or_else(|| format!("slot timestamp {} out of range", self.dt))?;
        let (main, description) = self
            .weather
            .into_iter()
            .next()
            .map_or_else(Default::default, |condition| {
                (condition.main, condition.description)
            });
        let (wind_speed, wind_direction) = self
            .wind
            .map_or((0.0, None), |wind| (wind.speed, wind.deg));
        Ok(ForecastSlot {
            time,
            temp: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            description,
            main,
            wind_speed,
            wind_direction,
            clouds: self.clouds.map_or(0, |clouds| clouds.all),
            visibility: self.visibility,
            rain_3h: self.rain.map_or(0.0, |rain| rain.three_hours),
            snow_3h: self.snow.map_or(0.0, |snow| snow.three_hours),
        })
    }
}
