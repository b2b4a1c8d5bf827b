//! Shared harness for end-to-end HTTP flows over the in-memory store.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use stable_backend::domain::ports::{
    DisabledGoogleIdentity, DisabledWeatherSource, PasswordHashError, PasswordHasher,
    UserRepository,
};
use stable_backend::domain::{
    AuthServiceImpl, Email, EventServiceImpl, ExpenseServiceImpl, HorseActivityServiceImpl,
    HorseServiceImpl, NewUser, Role, StableServiceImpl, StaffServiceImpl, StallServiceImpl,
    Username,
};
use stable_backend::inbound::http::health::HealthState;
use stable_backend::inbound::http::state::{HttpState, HttpStatePorts};
use stable_backend::outbound::auth::JwtCodec;
use stable_backend::outbound::memory::MemoryStore;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Reversible stand-in for Argon2 so flows stay fast in debug builds.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain${password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

pub struct Harness {
    pub store: MemoryStore,
    pub state: web::Data<HttpState>,
    pub health: web::Data<HealthState>,
}

impl Harness {
    /// Empty store plus one administrator account.
    pub async fn new() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let store = MemoryStore::new(clock.clone());
        let shared = Arc::new(store.clone());
        let hasher = Arc::new(PlainHasher);
        store
            .create(&NewUser {
                email: Email::new(ADMIN_EMAIL).expect("admin email"),
                username: Username::new("adminUser").expect("admin username"),
                role: Role::Admin,
                password_hash: Some(format!("plain${ADMIN_PASSWORD}")),
                google_id: None,
            })
            .await
            .expect("admin account");

        let ports = HttpStatePorts {
            auth: Arc::new(AuthServiceImpl::new(
                shared.clone(),
                hasher,
                Arc::new(JwtCodec::new(
                    b"integration-test-secret",
                    std::time::Duration::from_secs(600),
                    clock.clone(),
                )),
                Arc::new(DisabledGoogleIdentity),
            )),
            horses: Arc::new(HorseServiceImpl::new(shared.clone())),
            stalls: Arc::new(StallServiceImpl::new(shared.clone())),
            stables: Arc::new(StableServiceImpl::new(shared.clone())),
            staff: Arc::new(StaffServiceImpl::new(shared.clone())),
            expenses: Arc::new(ExpenseServiceImpl::new(shared.clone())),
            activities: Arc::new(HorseActivityServiceImpl::new(shared.clone())),
            events: Arc::new(EventServiceImpl::new(
                shared,
                Arc::new(DisabledWeatherSource),
                clock,
            )),
        };
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        Self {
            store,
            state: web::Data::new(HttpState::new(ports, "http://localhost:3000")),
            health,
        }
    }
}

/// Initialise the full application the way the server assembles it.
macro_rules! stable_app {
    ($harness:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($harness.health.clone())
                .app_data($harness.state.clone())
                .wrap(stable_backend::Trace)
                .wrap(
                    actix_session::SessionMiddleware::builder(
                        actix_session::storage::CookieSessionStore::default(),
                        actix_web::cookie::Key::generate(),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .configure(stable_backend::inbound::http::configure),
        )
        .await
    };
}

/// Send `request`, returning the status and the JSON body (`Null` when empty).
macro_rules! send {
    ($app:expr, $request:expr) => {{
        let res = actix_web::test::call_service(&$app, $request.to_request()).await;
        let status = res.status();
        let body = actix_web::test::read_body(res).await;
        let json: serde_json::Value =
            serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }};
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

pub fn login_body(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

/// Extract the raw token from a login response.
pub fn token_of(login: &Value) -> String {
    login["token"]
        .as_str()
        .and_then(|token| token.strip_prefix("Bearer "))
        .expect("bearer token in login response")
        .to_owned()
}
