//! Tests for event and weather endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{NaiveDate, NaiveTime, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::EventDetails;
use crate::inbound::http::test_utils::{MockPorts, USER_TOKEN, bearer};
use crate::inbound::http::validation::json_config;

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).expect("date")
}

fn event() -> Event {
    Event {
        id: EventId::from_uuid(uuid::Uuid::nil()),
        details: EventDetails::new(EventDraft {
            title: "Dressage lesson".into(),
            date: june(9),
            hour: NaiveTime::from_hms_opt(10, 30, 0),
            duration_hours: Some(1.5),
            location: Some("Kraków".into()),
            horse_id: None,
        })
        .expect("valid event"),
        created_at: Utc::now(),
    }
}

fn report() -> WeatherReport {
    WeatherReport {
        temp: 21,
        temp_min: 18,
        temp_max: 23,
        feels_like: 20,
        humidity: 55,
        pressure: 1015,
        description: "light rain".into(),
        main: "Rain".into(),
        wind_speed: 3.4,
        wind_direction: Some(240),
        clouds: 75,
        visibility_km: Some(10.0),
        rain_3h: 0.8,
        snow_3h: 0.0,
        forecast_time: "09:00".into(),
        training_period: "10:30 - 12:00".into(),
        location: "Krakow,PL".into(),
    }
}

async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_state())
            .app_data(json_config())
            .service(
                web::scope("/events")
                    .service(events_between)
                    .service(create_event)
                    .service(event_weather)
                    .service(events_on_date)
                    .service(delete_event),
            ),
    )
    .await;
    let res = actix_test::call_service(
        &app,
        request.insert_header(bearer(USER_TOKEN)).to_request(),
    )
    .await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[rstest]
#[actix_web::test]
async fn on_date_returns_bare_array() {
    let mut ports = MockPorts::accepting_tokens();
    ports
        .events
        .expect_on_date()
        .withf(|date| *date == june(9))
        .returning(|_| Ok(vec![event()]));
    let (status, body) = send(
        ports,
        actix_test::TestRequest::get().uri("/events/2025-06-09"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let first = &body[0];
    assert_eq!(first["title"], "Dressage lesson");
    assert_eq!(first["date"], "2025-06-09");
    assert_eq!(first["hour"], "10:30");
    assert_eq!(first["duration"], 1.5);
}

#[rstest]
#[actix_web::test]
async fn between_accepts_timestamps() {
    let mut ports = MockPorts::accepting_tokens();
    ports
        .events
        .expect_between()
        .withf(|range| range.start() == june(1) && range.end() == june(30))
        .returning(|_| Ok(vec![]));
    let (status, body) = send(
        ports,
        actix_test::TestRequest::get()
            .uri("/events?start=2025-06-01T00:00:00Z&end=2025-06-30"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[rstest]
#[case::inverted("/events?start=2025-06-30&end=2025-06-01", "end")]
#[case::missing_end("/events?start=2025-06-01", "end")]
#[case::bad_start("/events?start=soon&end=2025-06-01", "start")]
#[actix_web::test]
async fn between_rejects_bad_ranges(#[case] uri: &str, #[case] field: &str) {
    let mut ports = MockPorts::accepting_tokens();
    ports.events.expect_between().never();
    let (status, body) = send(ports, actix_test::TestRequest::get().uri(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn create_returns_bare_event() {
    let mut ports = MockPorts::accepting_tokens();
    ports
        .events
        .expect_create()
        .withf(|draft| {
            draft.hour == NaiveTime::from_hms_opt(10, 30, 0) && draft.duration_hours == Some(1.5)
        })
        .returning(|_| Ok(event()));
    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/events").set_json(json!({
            "title": "Dressage lesson",
            "date": "2025-06-09",
            "hour": "10:30",
            "duration": 1.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["location"], "Kraków");
}

#[rstest]
#[actix_web::test]
async fn create_rejects_bad_hour() {
    let mut ports = MockPorts::accepting_tokens();
    ports.events.expect_create().never();
    let (status, body) = send(
        ports,
        actix_test::TestRequest::post().uri("/events").set_json(json!({
            "title": "Lesson",
            "date": "2025-06-09",
            "hour": "half past ten"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "hour");
}

#[rstest]
#[actix_web::test]
async fn delete_responds_no_content() {
    let mut ports = MockPorts::accepting_tokens();
    ports.events.expect_delete().returning(|_| Ok(()));
    let (status, _) = send(
        ports,
        actix_test::TestRequest::delete()
            .uri("/events/00000000-0000-0000-0000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[rstest]
#[actix_web::test]
async fn weather_reports_countdown() {
    let mut ports = MockPorts::accepting_tokens();
    ports.events.expect_weather().returning(|_| {
        Ok(WeatherOutlook::NotYetAvailable {
            days_until_available: 3,
        })
    });
    let (status, body) = send(
        ports,
        actix_test::TestRequest::get()
            .uri("/events/00000000-0000-0000-0000-000000000000/weather"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "available": false, "daysUntilAvailable": 3 }));
}

#[rstest]
#[actix_web::test]
async fn weather_returns_forecast() {
    let mut ports = MockPorts::accepting_tokens();
    ports
        .events
        .expect_weather()
        .returning(|_| Ok(WeatherOutlook::Available(report())));
    let (status, body) = send(
        ports,
        actix_test::TestRequest::get()
            .uri("/events/00000000-0000-0000-0000-000000000000/weather"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    let forecast = &body["forecast"];
    assert_eq!(forecast["rain3h"], 0.8);
    assert_eq!(forecast["trainingPeriod"], "10:30 - 12:00");
    assert_eq!(forecast["windDirection"], 240);
}

#[rstest]
#[actix_web::test]
async fn weather_provider_outage_is_unavailable() {
    let mut ports = MockPorts::accepting_tokens();
    ports
        .events
        .expect_weather()
        .returning(|_| Err(Error::service_unavailable("weather provider unavailable")));
    let (status, body) = send(
        ports,
        actix_test::TestRequest::get()
            .uri("/events/00000000-0000-0000-0000-000000000000/weather"),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}
