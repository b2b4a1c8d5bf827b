//! Bearer token extractors used by HTTP handlers.
//!
//! Handlers declare [`Authenticated`] or [`AdminOnly`] as an argument and the
//! extractor rejects the request before the handler body runs:
//! a missing or malformed `Authorization` header is `401`, a token the auth
//! service rejects is `403`, and a non-admin on an admin route is `403`.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{AccessClaims, Error};

use super::state::HttpState;

const NO_TOKEN: &str = "Access denied. No token provided";
const ADMIN_ONLY: &str = "Access denied. Admin only";

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(NO_TOKEN))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Authorization header must be ASCII"))?;
    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(Error::unauthorized(NO_TOKEN)),
    }
}

fn verify(req: &HttpRequest) -> Result<AccessClaims, Error> {
    let token = bearer_token(req)?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    state.auth.authenticate(token)
}

/// Claims of any signed-in user.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AccessClaims);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(verify(req).map(Self))
    }
}

/// Claims of a signed-in administrator.
#[derive(Debug, Clone)]
pub struct AdminOnly(pub AccessClaims);

impl FromRequest for AdminOnly {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(verify(req).and_then(|claims| {
            if claims.role.is_admin() {
                Ok(Self(claims))
            } else {
                Err(Error::forbidden(ADMIN_ONLY))
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::{ADMIN_TOKEN, MockPorts, USER_TOKEN};

    async fn call(path: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(MockPorts::accepting_tokens().into_state())
                .route(
                    "/user",
                    web::get().to(|Authenticated(claims): Authenticated| async move {
                        HttpResponse::Ok().json(serde_json::json!({ "role": claims.role.as_str() }))
                    }),
                )
                .route(
                    "/admin",
                    web::get().to(|AdminOnly(claims): AdminOnly| async move {
                        HttpResponse::Ok().json(serde_json::json!({ "role": claims.role.as_str() }))
                    }),
                ),
        )
        .await;
        let mut request = actix_test::TestRequest::get().uri(path);
        if let Some(value) = authorization {
            request = request.insert_header(("Authorization", value));
        }
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    #[rstest]
    #[case::missing(None)]
    #[case::wrong_scheme(Some("Basic abc"))]
    #[case::empty_token(Some("Bearer "))]
    #[actix_web::test]
    async fn missing_or_malformed_header_is_unauthorised(#[case] header: Option<&str>) {
        let (status, body) = call("/user", header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[rstest]
    #[actix_web::test]
    async fn rejected_token_is_forbidden() {
        let (status, body) = call("/user", Some("Bearer forged")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[rstest]
    #[actix_web::test]
    async fn accepted_token_reaches_handler() {
        let header = format!("Bearer {USER_TOKEN}");
        let (status, body) = call("/user", Some(&header)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "user");
    }

    #[rstest]
    #[actix_web::test]
    async fn admin_route_rejects_regular_users() {
        let header = format!("Bearer {USER_TOKEN}");
        let (status, body) = call("/admin", Some(&header)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], ADMIN_ONLY);
    }

    #[rstest]
    #[actix_web::test]
    async fn admin_route_accepts_lowercase_scheme() {
        let header = format!("bearer {ADMIN_TOKEN}");
        let (status, body) = call("/admin", Some(&header)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "admin");
    }
}
