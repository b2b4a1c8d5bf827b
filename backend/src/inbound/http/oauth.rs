//! Google sign-in endpoints.
//!
//! ```text
//! GET /oauth/google            302 to Google with state + PKCE challenge
//! GET /oauth/google/callback   HTML page posting the token to the opener
//! ```
//!
//! The callback runs inside the popup the frontend opened, so it answers with
//! a tiny page that hands the result to `window.opener` and closes itself.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::domain::{Error, SignedIn};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query parameters Google appends to the redirect URL.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by Google when the user declines consent.
    pub error: Option<String>,
}

/// Payload delivered to the frontend through `postMessage`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInMessage<'a> {
    token: String,
    user_id: String,
    username: &'a str,
    role: &'a str,
}

/// Serialise a value for embedding inside an inline `<script>`.
fn script_literal<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string(value)
        .map(|raw| {
            raw.replace('<', "\\u003c")
                .replace('>', "\\u003e")
                .replace('&', "\\u0026")
        })
        .map_err(|err| Error::internal(format!("failed to encode sign-in result: {err}")))
}

fn completion_page(signed: &SignedIn, frontend_origin: &str) -> Result<String, Error> {
    let message = SignInMessage {
        token: signed.token.bearer(),
        user_id: signed.user.id.to_string(),
        username: signed.user.username.as_ref(),
        role: signed.user.role.as_str(),
    };
    let payload = script_literal(&message)?;
    let origin = script_literal(&frontend_origin)?;
    Ok(format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Signed in</title></head>
<body>
<p>Sign-in complete. You can close this window.</p>
<script>
(function () {{
  if (window.opener) {{
    window.opener.postMessage({payload}, {origin});
  }}
  window.close();
}})();
</script>
</body>
</html>
"#
    ))
}

fn mismatched_state() -> Error {
    Error::invalid_request("OAuth state mismatch").with_details(json!({ "code": "oauth_state" }))
}

/// Start Google sign-in.
#[utoipa::path(
    get,
    path = "/oauth/google",
    responses(
        (status = 302, description = "Redirect to Google", headers(("Location" = String, description = "Google authorisation URL"))),
        (status = 503, description = "Google sign-in not configured", body = ErrorSchema)
    ),
    tags = ["oauth"],
    operation_id = "googleSignIn",
    security([])
)]
#[get("/google")]
pub async fn google_start(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let authorization = state.auth.google_authorization()?;
    session.begin_sign_in(&authorization.state, &authorization.pkce_verifier)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, authorization.url))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish())
}

/// Finish Google sign-in and hand the token to the frontend.
#[utoipa::path(
    get,
    path = "/oauth/google/callback",
    params(CallbackQuery),
    responses(
        (status = 200, description = "Completion page", body = String, content_type = "text/html"),
        (status = 400, description = "State mismatch or consent declined", body = ErrorSchema),
        (status = 503, description = "Google sign-in unavailable", body = ErrorSchema)
    ),
    tags = ["oauth"],
    operation_id = "googleCallback",
    security([])
)]
#[get("/google/callback")]
pub async fn google_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    if !state.auth.google_configured() {
        return Err(Error::service_unavailable("Google sign-in is not configured"));
    }
    let query = query.into_inner();
    let pending = session.take_sign_in();
    if let Some(reason) = query.error {
        warn!(reason = %reason, "Google sign-in declined");
        return Err(Error::invalid_request("Google sign-in was cancelled")
            .with_details(json!({ "code": "oauth_declined" })));
    }
    let (Some(pending), Some(returned)) = (pending, query.state) else {
        return Err(mismatched_state());
    };
    if pending.state != returned {
        warn!("OAuth callback state did not match the session");
        return Err(mismatched_state());
    }
    let code = query
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| Error::invalid_field("code", "missing authorisation code"))?;

    let signed = state
        .auth
        .google_sign_in(&code, &pending.pkce_verifier)
        .await?;
    let page = completion_page(&signed, &state.frontend_origin)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(page))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::GoogleAuthorization;
    use crate::domain::{AccessToken, Email, Role, User, UserId, Username};
    use crate::inbound::http::test_utils::{MockPorts, test_session_middleware};

    fn signed_in() -> SignedIn {
        let now = Utc::now();
        SignedIn {
            user: User {
                id: UserId::from_uuid(uuid::Uuid::nil()),
                email: Email::new("ada@example.com").expect("email"),
                username: Username::new("Ada</script>").expect("username"),
                role: Role::User,
                password_hash: None,
                google_id: Some("g-1".into()),
                created_at: now,
                updated_at: now,
            },
            token: AccessToken::new("jwt"),
        }
    }

    fn configured_ports() -> MockPorts {
        let mut ports = MockPorts::default();
        ports.auth.expect_google_configured().return_const(true);
        ports.auth.expect_google_authorization().returning(|| {
            Ok(GoogleAuthorization {
                url: "https://accounts.google.com/o/oauth2/v2/auth?state=s1".into(),
                state: "s1".into(),
                pkce_verifier: "v1".into(),
            })
        });
        ports
    }

    macro_rules! oauth_app {
        ($ports:expr) => {
            actix_test::init_service(
                App::new()
                    .wrap(test_session_middleware())
                    .app_data($ports.into_state())
                    .service(
                        web::scope("/oauth")
                            .service(google_start)
                            .service(google_callback),
                    ),
            )
            .await
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn start_redirects_and_callback_posts_token() {
        let mut ports = configured_ports();
        ports
            .auth
            .expect_google_sign_in()
            .withf(|code, verifier| code == "c1" && verifier == "v1")
            .returning(|_, _| Ok(signed_in()));
        let app = oauth_app!(ports);

        let start = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/oauth/google").to_request(),
        )
        .await;
        assert_eq!(start.status(), StatusCode::FOUND);
        let location = start
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        assert_eq!(
            location.as_deref(),
            Some("https://accounts.google.com/o/oauth2/v2/auth?state=s1")
        );
        let cookie = start
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned();

        let callback = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/oauth/google/callback?code=c1&state=s1")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(callback.status(), StatusCode::OK);
        let body = actix_test::read_body(callback).await;
        let html = std::str::from_utf8(&body).expect("utf-8 page");
        assert!(html.contains("\"token\":\"Bearer jwt\""));
        assert!(html.contains("\"http://localhost:3000\""));
        assert!(!html.contains("Ada</script>"), "payload must be escaped");
    }

    #[rstest]
    #[actix_web::test]
    async fn callback_without_pending_state_is_rejected() {
        let mut ports = configured_ports();
        ports.auth.expect_google_sign_in().never();
        let app = oauth_app!(ports);
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/oauth/google/callback?code=c1&state=s1")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn unconfigured_google_is_unavailable() {
        let mut ports = MockPorts::default();
        ports.auth.expect_google_configured().return_const(false);
        ports
            .auth
            .expect_google_authorization()
            .returning(|| Err(Error::service_unavailable("Google sign-in is not configured")));
        let app = oauth_app!(ports);
        for uri in ["/oauth/google", "/oauth/google/callback?code=c&state=s"] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri(uri).to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        }
    }
}
