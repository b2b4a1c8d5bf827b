//! Session helpers for the Google sign-in flow.
//!
//! The signed session cookie only carries the pending CSRF state and PKCE
//! verifier between `/oauth/google` and its callback. Everything else uses
//! bearer tokens.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::Error;

pub(crate) const OAUTH_STATE_KEY: &str = "oauth_state";
pub(crate) const OAUTH_VERIFIER_KEY: &str = "oauth_pkce_verifier";

/// Pending authorisation stored while the user is at Google.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSignIn {
    pub state: String,
    pub pkce_verifier: String,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember the state and verifier of an authorisation in progress.
    pub fn begin_sign_in(&self, state: &str, pkce_verifier: &str) -> Result<(), Error> {
        let persist = |key: &str, value: &str| {
            self.0
                .insert(key, value)
                .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
        };
        persist(OAUTH_STATE_KEY, state)?;
        persist(OAUTH_VERIFIER_KEY, pkce_verifier)
    }

    /// Remove and return the pending authorisation, if any.
    ///
    /// The entries are cleared even when only one of them is present so a
    /// callback cannot be replayed.
    pub fn take_sign_in(&self) -> Option<PendingSignIn> {
        let read = |key: &str| {
            self.0
                .remove_as::<String>(key)
                .transpose()
                .map_err(|raw| {
                    warn!(len = raw.len(), "discarding unreadable OAuth session entry");
                })
                .ok()
                .flatten()
        };
        let state = read(OAUTH_STATE_KEY);
        let pkce_verifier = read(OAUTH_VERIFIER_KEY);
        state
            .zip(pkce_verifier)
            .map(|(state, pkce_verifier)| PendingSignIn {
                state,
                pkce_verifier,
            })
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/begin",
                web::get().to(|session: SessionContext| async move {
                    session.begin_sign_in("state-1", "verifier-1")?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/take",
                web::get().to(|session: SessionContext| async move {
                    match session.take_sign_in() {
                        Some(p) => HttpResponse::Ok().body(format!("{}:{}", p.state, p.pkce_verifier)),
                        None => HttpResponse::NoContent().finish(),
                    }
                }),
            )
    }

    #[actix_web::test]
    async fn pending_sign_in_round_trips_once() {
        let app = test::init_service(session_test_app()).await;

        let begin =
            test::call_service(&app, test::TestRequest::get().uri("/begin").to_request()).await;
        let cookie = begin
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let take = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/take")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(take.status(), StatusCode::OK);
        let cleared = take
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(|cookie| cookie.into_owned());
        let body = test::read_body(take).await;
        assert_eq!(body, "state-1:verifier-1");

        let mut replay = test::TestRequest::get().uri("/take");
        if let Some(cookie) = cleared {
            replay = replay.cookie(cookie);
        }
        let replay = test::call_service(&app, replay.to_request()).await;
        assert_eq!(replay.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn missing_pending_sign_in_is_none() {
        let app = test::init_service(session_test_app()).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/take").to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
