//! Event schedule and weather endpoints.
//!
//! Unlike the CRUD collections these respond with bare JSON values:
//! arrays for listings and the event object itself on create.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Event, EventDraft, EventId, EventRange, WeatherOutlook, WeatherReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_date, parse_id, parse_optional_hour, parse_optional_id, require,
};

const ID: FieldName = FieldName::new("id");
const DATE: FieldName = FieldName::new("date");
const HOUR: FieldName = FieldName::new("hour");
const TITLE: FieldName = FieldName::new("title");
const HORSE_ID: FieldName = FieldName::new("horseId");
const START: FieldName = FieldName::new("start");
const END: FieldName = FieldName::new("end");

#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EventRequest {
    pub title: Option<String>,
    #[schema(example = "2025-06-09")]
    pub date: Option<String>,
    #[schema(example = "10:30")]
    pub hour: Option<String>,
    /// Length in hours; fractions are allowed.
    pub duration: Option<f64>,
    pub location: Option<String>,
    pub horse_id: Option<String>,
}

impl TryFrom<EventRequest> for EventDraft {
    type Error = Error;

    fn try_from(value: EventRequest) -> Result<Self, Self::Error> {
        let raw_date = require(value.date, DATE)?;
        Ok(Self {
            title: require(value.title, TITLE)?,
            date: parse_date(&raw_date, DATE)?,
            hour: parse_optional_hour(value.hour.as_deref(), HOUR)?,
            duration_hours: value.duration,
            location: value.location,
            horse_id: parse_optional_id(value.horse_id.as_deref(), HORSE_ID)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub hour: Option<String>,
    /// Hours.
    pub duration: Option<f64>,
    pub location: Option<String>,
    pub horse_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let details = &event.details;
        Self {
            id: event.id.to_string(),
            title: details.title().to_owned(),
            date: details.date(),
            hour: details.hour().map(|hour| hour.format("%H:%M").to_string()),
            duration: details
                .duration_minutes()
                .map(|minutes| f64::from(minutes) / 60.0),
            location: details.location().map(str::to_owned),
            horse_id: details.horse_id().map(|id| id.to_string()),
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
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
    #[serde(rename = "rain3h")]
    pub rain_3h: f64,
    #[serde(rename = "snow3h")]
    pub snow_3h: f64,
    pub forecast_time: String,
    pub training_period: String,
    pub location: String,
}

impl From<WeatherReport> for ForecastResponse {
    fn from(report: WeatherReport) -> Self {
        Self {
            temp: report.temp,
            temp_min: report.temp_min,
            temp_max: report.temp_max,
            feels_like: report.feels_like,
            humidity: report.humidity,
            pressure: report.pressure,
            description: report.description,
            main: report.main,
            wind_speed: report.wind_speed,
            wind_direction: report.wind_direction,
            clouds: report.clouds,
            visibility_km: report.visibility_km,
            rain_3h: report.rain_3h,
            snow_3h: report.snow_3h,
            forecast_time: report.forecast_time,
            training_period: report.training_period,
            location: report.location,
        }
    }
}

/// Either a forecast or the number of days until one can be fetched.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_available: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastResponse>,
}

impl From<WeatherOutlook> for WeatherResponse {
    fn from(outlook: WeatherOutlook) -> Self {
        match outlook {
            WeatherOutlook::NotYetAvailable {
                days_until_available,
            } => Self {
                available: false,
                days_until_available: Some(days_until_available),
                forecast: None,
            },
            WeatherOutlook::Available(report) => Self {
                available: true,
                days_until_available: None,
                forecast: Some(report.into()),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// Inclusive start, `YYYY-MM-DD` or RFC 3339.
    pub start: Option<String>,
    /// Inclusive end.
    pub end: Option<String>,
}

impl TryFrom<&RangeQuery> for EventRange {
    type Error = Error;

    fn try_from(query: &RangeQuery) -> Result<Self, Self::Error> {
        let start = parse_date(&require(query.start.clone(), START)?, START)?;
        let end = parse_date(&require(query.end.clone(), END)?, END)?;
        EventRange::new(start, end)
            .map_err(|_| Error::invalid_field("end", "end must not be before start"))
    }
}

fn responses(events: Vec<Event>) -> Vec<EventResponse> {
    events.into_iter().map(EventResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/events",
    params(RangeQuery),
    responses(
        (status = 200, description = "Events in the range", body = [EventResponse]),
        (status = 400, description = "Missing or inverted range", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEventsBetween"
)]
#[get("")]
pub async fn events_between(
    state: web::Data<HttpState>,
    _user: Authenticated,
    query: web::Query<RangeQuery>,
) -> ApiResult<web::Json<Vec<EventResponse>>> {
    let range = EventRange::try_from(&*query)?;
    Ok(web::Json(responses(state.events.between(range).await?)))
}

#[utoipa::path(
    get,
    path = "/events/{date}",
    params(("date" = String, Path, description = "Calendar date")),
    responses(
        (status = 200, description = "Events on the date", body = [EventResponse]),
        (status = 400, description = "Unparseable date", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEventsOnDate"
)]
#[get("/{date}")]
pub async fn events_on_date(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<EventResponse>>> {
    let date = parse_date(&path, DATE)?;
    Ok(web::Json(responses(state.events.on_date(date).await?)))
}

#[utoipa::path(
    post,
    path = "/events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid event", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("")]
pub async fn create_event(
    state: web::Data<HttpState>,
    _user: Authenticated,
    payload: web::Json<EventRequest>,
) -> ApiResult<HttpResponse> {
    let draft = EventDraft::try_from(payload.into_inner())?;
    let event = state.events.create(draft).await?;
    Ok(HttpResponse::Created().json(EventResponse::from(event)))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/{id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id: EventId = parse_id(&path, ID)?;
    state.events.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/events/{id}/weather",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Forecast or availability countdown", body = WeatherResponse),
        (status = 404, description = "Event or forecast slot not found", body = ErrorSchema),
        (status = 503, description = "Weather provider unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "eventWeather"
)]
#[get("/{id}/weather")]
pub async fn event_weather(
    state: web::Data<HttpState>,
    _user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<WeatherResponse>> {
    let id: EventId = parse_id(&path, ID)?;
    Ok(web::Json(state.events.weather(id).await?.into()))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
