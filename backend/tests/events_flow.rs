//! Calendar events and their weather outlook.

#[macro_use]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Days, Utc};
use serde_json::json;

use support::{ADMIN_EMAIL, ADMIN_PASSWORD, Harness, bearer, login_body, token_of};

#[actix_web::test]
async fn created_events_show_up_by_date_and_range() {
    let harness = Harness::new().await;
    let app = stable_app!(harness);
    let (_, login) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(login_body(ADMIN_EMAIL, ADMIN_PASSWORD))
    );
    let token = token_of(&login);

    for (title, date) in [("Farrier", "2025-06-09"), ("Vet check", "2025-06-12")] {
        let (status, event) = send!(
            app,
            test::TestRequest::post()
                .uri("/events")
                .insert_header(bearer(&token))
                .set_json(json!({ "title": title, "date": date, "hour": "10:30", "duration": 1.5 }))
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(event["hour"], "10:30");
        assert_eq!(event["duration"], 1.5);
    }

    let (status, on_day) = send!(
        app,
        test::TestRequest::get()
            .uri("/events/2025-06-09")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = on_day
        .as_array()
        .expect("bare array")
        .iter()
        .map(|event| event["title"].clone())
        .collect();
    assert_eq!(titles, vec![json!("Farrier")]);

    let (status, between) = send!(
        app,
        test::TestRequest::get()
            .uri("/events?start=2025-06-01&end=2025-06-30")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(between.as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn weather_outlook_depends_on_distance_to_event() {
    let harness = Harness::new().await;
    let app = stable_app!(harness);
    let (_, login) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(login_body(ADMIN_EMAIL, ADMIN_PASSWORD))
    );
    let token = token_of(&login);
    let today = Utc::now().date_naive();

    let far = today.checked_add_days(Days::new(30)).expect("date in range");
    let (_, event) = send!(
        app,
        test::TestRequest::post()
            .uri("/events")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Show jumping", "date": far.to_string() }))
    );
    let id = event["_id"].as_str().expect("event id").to_owned();
    let (status, outlook) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/events/{id}/weather"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outlook["available"], false);
    assert_eq!(outlook["daysUntilAvailable"], 25);

    let (_, event) = send!(
        app,
        test::TestRequest::post()
            .uri("/events")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Hack", "date": today.to_string() }))
    );
    let id = event["_id"].as_str().expect("event id").to_owned();
    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/events/{id}/weather"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[actix_web::test]
async fn deleted_event_disappears() {
    let harness = Harness::new().await;
    let app = stable_app!(harness);
    let (_, login) = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(login_body(ADMIN_EMAIL, ADMIN_PASSWORD))
    );
    let token = token_of(&login);

    let (_, event) = send!(
        app,
        test::TestRequest::post()
            .uri("/events")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Farrier", "date": "2025-06-09" }))
    );
    let id = event["_id"].as_str().expect("event id").to_owned();

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/events/{id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/events/{id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}
