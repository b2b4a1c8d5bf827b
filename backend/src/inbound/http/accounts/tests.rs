//! Tests for account endpoints.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::Utc;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{AccessToken, Email, Role, SignedIn, UserId, Username};
use crate::inbound::http::test_utils::{MockPorts, USER_TOKEN, bearer};
use crate::inbound::http::validation::json_config;

fn stored_user(role: Role) -> User {
    let now = Utc::now();
    User {
        id: UserId::from_uuid(uuid::Uuid::nil()),
        email: Email::new("admin@example.com").expect("email"),
        username: Username::new("adminUser").expect("username"),
        role,
        password_hash: Some("$argon2id$secret".into()),
        google_id: None,
        created_at: now,
        updated_at: now,
    }
}

async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_state())
            .app_data(json_config())
            .service(
                web::scope("/auth")
                    .service(register)
                    .service(login)
                    .service(me),
            ),
    )
    .await;
    let res = actix_test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let body = actix_test::read_body(res).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[rstest]
#[actix_web::test]
async fn register_returns_created_message() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_register()
        .withf(|registration| registration.email().as_ref() == "rider@example.com")
        .returning(|_| Ok(stored_user(Role::User)));
    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "username": "rider", "email": "Rider@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully!");
}

#[rstest]
#[case(json!({ "username": "rider", "email": "nope", "password": "secret1" }), "email")]
#[case(json!({ "username": "rider", "email": "a@b.co", "password": "123" }), "password")]
#[case(json!({ "username": " ", "email": "a@b.co", "password": "secret1" }), "username")]
#[actix_web::test]
async fn register_validation_names_the_field(#[case] payload: Value, #[case] field: &str) {
    let mut ports = MockPorts::default();
    ports.auth.expect_register().never();
    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let (status, body) = send(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_json");
}

#[rstest]
#[actix_web::test]
async fn login_returns_bearer_token_and_identity() {
    let mut ports = MockPorts::default();
    ports.auth.expect_login().returning(|_| {
        Ok(SignedIn {
            user: stored_user(Role::Admin),
            token: AccessToken::new("jwt"),
        })
    });
    let (status, body) = send(
        ports,
        actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "admin@example.com", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful!");
    assert_eq!(body["token"], "Bearer jwt");
    assert_eq!(body["username"], "adminUser");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["userId"], uuid::Uuid::nil().to_string());
}

#[rstest]
#[actix_web::test]
async fn me_omits_password_hash() {
    let mut ports = MockPorts::accepting_tokens();
    ports
        .auth
        .expect_current_user()
        .returning(|_| Ok(stored_user(Role::User)));
    let (status, body) = send(
        ports,
        actix_test::TestRequest::get()
            .uri("/auth/me")
            .insert_header(bearer(USER_TOKEN)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], uuid::Uuid::nil().to_string());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("googleId").is_none());
}

#[rstest]
#[actix_web::test]
async fn me_requires_token() {
    let (status, _) = send(
        MockPorts::default(),
        actix_test::TestRequest::get().uri("/auth/me"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
