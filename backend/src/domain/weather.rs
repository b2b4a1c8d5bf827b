//! Forecast selection for scheduled events.
//!
//! The provider publishes three-hour slots for the next five days. For an
//! event we pick the slot that best covers its training window and round the
//! readings for display.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::TrainingWindow;

/// Days ahead covered by the provider's forecast.
pub const FORECAST_HORIZON_DAYS: i64 = 5;
/// Length of one forecast slot, in hours.
pub const SLOT_HOURS: i64 = 3;
/// Provider query used for unknown locations.
pub const DEFAULT_PROVIDER_LOCATION: &str = "Warsaw,PL";

const CITY_TABLE: &[(&str, &str)] = &[
    ("Krakow", "Krakow,PL"),
    ("Gdansk", "Gdansk,PL"),
    ("Warszawa", "Warsaw,PL"),
    ("Poznan", "Poznan,PL"),
    ("Wroclaw", "Wroclaw,PL"),
];

/// Map an event location label to the provider's `q` parameter.
///
/// # Examples
/// ```
/// use stable_backend::domain::provider_location;
///
/// assert_eq!(provider_location(Some("Gdansk")), "Gdansk,PL");
/// assert_eq!(provider_location(Some("Lodz")), "Warsaw,PL");
/// assert_eq!(provider_location(None), "Warsaw,PL");
/// ```
pub fn provider_location(label: Option<&str>) -> &'static str {
    label
        .and_then(|label| {
            CITY_TABLE
                .iter()
                .find(|(city, _)| *city == label.trim())
                .map(|(_, query)| *query)
        })
        .unwrap_or(DEFAULT_PROVIDER_LOCATION)
}

/// One three-hour forecast entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSlot {
    /// Start of the slot.
    pub time: DateTime<Utc>,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub pressure: i64,
    pub description: String,
    pub main: String,
    /// Metres per second.
    pub wind_speed: f64,
    /// Degrees clockwise from north.
    pub wind_direction: Option<i64>,
    /// Cloud cover percentage.
    pub clouds: i64,
    /// Metres.
    pub visibility: Option<i64>,
    /// Millimetres over the slot.
    pub rain_3h: f64,
    /// Millimetres over the slot.
    pub snow_3h: f64,
}

impl ForecastSlot {
    fn end(&self) -> DateTime<Utc> {
        self.time + Duration::hours(SLOT_HOURS)
    }

    fn overlaps(&self, window: &TrainingWindow) -> bool {
        self.time <= window.end && self.end() >= window.start
    }

    fn distance_to(&self, instant: DateTime<Utc>) -> Duration {
        (self.time - instant).abs()
    }
}

fn closest<'a>(
    slots: impl Iterator<Item = &'a ForecastSlot>,
    instant: DateTime<Utc>,
) -> Option<&'a ForecastSlot> {
    // `min_by_key` keeps the first of equal elements, matching provider order.
    slots.min_by_key(|slot| slot.distance_to(instant))
}

/// Choose the slot describing `window`.
///
/// Preference order: slots overlapping the window, then slots on the same
/// UTC date, then any slot; within each group the slot starting closest to
/// the window start wins.
pub fn select_slot<'a>(
    slots: &'a [ForecastSlot],
    window: &TrainingWindow,
) -> Option<&'a ForecastSlot> {
    let start = window.start;
    closest(slots.iter().filter(|slot| slot.overlaps(window)), start)
        .or_else(|| {
            let day = start.date_naive();
            closest(
                slots.iter().filter(|slot| slot.time.date_naive() == day),
                start,
            )
        })
        .or_else(|| closest(slots.iter(), start))
}

/// Whole days from `today` until `event_date`; negative for past events.
pub fn days_until(event_date: NaiveDate, today: NaiveDate) -> i64 {
    (event_date - today).num_days()
}

/// Rounded forecast for an event.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temp: i64,
    pub temp_min: i64,
    pub temp_max: i64,
    pub feels_like: i64,
    pub humidity: i64,
    pub pressure: i64,
    pub description: String,
    pub main: String,
    pub wind_speed: f64,
    pub wind_direction: Option<i64>,
    pub clouds: i64,
    pub visibility_km: Option<f64>,
    pub rain_3h: f64,
    pub snow_3h: f64,
    /// `HH:MM` start of the chosen slot.
    pub forecast_time: String,
    /// `HH:MM - HH:MM` training window.
    pub training_period: String,
    /// Provider location queried.
    pub location: String,
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

impl WeatherReport {
    pub fn from_slot(slot: &ForecastSlot, window: &TrainingWindow, location: &str) -> Self {
        Self {
            temp: round_whole(slot.temp),
            temp_min: round_whole(slot.temp_min),
            temp_max: round_whole(slot.temp_max),
            feels_like: round_whole(slot.feels_like),
            humidity: slot.humidity,
            pressure: slot.pressure,
            description: slot.description.clone(),
            main: slot.main.clone(),
            wind_speed: round_to_tenth(slot.wind_speed),
            wind_direction: slot.wind_direction,
            clouds: slot.clouds,
            visibility_km: slot
                .visibility
                .map(|metres| round_to_tenth(metres as f64 / 1000.0)),
            rain_3h: slot.rain_3h,
            snow_3h: slot.snow_3h,
            forecast_time: slot.time.format("%H:%M").to_string(),
            training_period: format!(
                "{} - {}",
                window.start.format("%H:%M"),
                window.end.format("%H:%M")
            ),
            location: location.to_owned(),
        }
    }
}

/// Result of a weather lookup for an event.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherOutlook {
    /// The event lies beyond the forecast horizon.
    NotYetAvailable { days_until_available: i64 },
    Available(WeatherReport),
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn slot(time: DateTime<Utc>) -> ForecastSlot {
        ForecastSlot {
            time,
            temp: 21.6,
            temp_min: 19.4,
            temp_max: 22.5,
            feels_like: 21.2,
            humidity: 60,
            pressure: 1012,
            description: "light rain".into(),
            main: "Rain".into(),
            wind_speed: 3.46,
            wind_direction: Some(250),
            clouds: 75,
            visibility: Some(9_870),
            rain_3h: 0.4,
            snow_3h: 0.0,
        }
    }

    #[fixture]
    fn window() -> TrainingWindow {
        TrainingWindow {
            start: at(9, 10),
            end: at(9, 11),
        }
    }

    #[rstest]
    fn prefers_overlapping_slot_closest_to_start(window: TrainingWindow) {
        let slots = vec![slot(at(9, 6)), slot(at(9, 9)), slot(at(9, 12))];
        let chosen = select_slot(&slots, &window).expect("slot");
        assert_eq!(chosen.time, at(9, 9));
    }

    #[rstest]
    fn falls_back_to_same_day(window: TrainingWindow) {
        let slots = vec![slot(at(8, 21)), slot(at(9, 15)), slot(at(9, 21))];
        let chosen = select_slot(&slots, &window).expect("slot");
        assert_eq!(chosen.time, at(9, 15));
    }

    #[rstest]
    fn falls_back_to_closest_overall(window: TrainingWindow) {
        let slots = vec![slot(at(7, 12)), slot(at(10, 3))];
        let chosen = select_slot(&slots, &window).expect("slot");
        assert_eq!(chosen.time, at(10, 3));
    }

    #[rstest]
    fn no_slots_yields_none(window: TrainingWindow) {
        assert!(select_slot(&[], &window).is_none());
    }

    #[rstest]
    fn report_rounds_readings(window: TrainingWindow) {
        let report = WeatherReport::from_slot(&slot(at(9, 9)), &window, "Warsaw,PL");
        assert_eq!(report.temp, 22);
        assert_eq!(report.temp_min, 19);
        assert_eq!(report.feels_like, 21);
        assert!((report.wind_speed - 3.5).abs() < f64::EPSILON);
        assert_eq!(report.visibility_km, Some(9.9));
        assert_eq!(report.forecast_time, "09:00");
        assert_eq!(report.training_period, "10:00 - 11:00");
    }

    #[rstest]
    #[case(9, 9, 0)]
    #[case(9, 15, 6)]
    #[case(9, 1, -8)]
    fn counts_days_until_event(#[case] today: u32, #[case] event: u32, #[case] expected: i64) {
        let date = |day| NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date");
        assert_eq!(days_until(date(event), date(today)), expected);
    }
}
