//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::ports::{
    MockAuthService, MockEventService, MockExpenseService, MockHorseActivityService,
    MockHorseService, MockStableService, MockStaffService, MockStallService,
};
use crate::domain::{AccessClaims, Email, Role, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Token accepted by [`MockPorts::accepting_tokens`] for a regular user.
pub const USER_TOKEN: &str = "user-token";
/// Token accepted by [`MockPorts::accepting_tokens`] for an administrator.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

pub fn claims(role: Role) -> AccessClaims {
    AccessClaims {
        user_id: UserId::from_uuid(uuid::Uuid::nil()),
        email: Email::new("rider@example.com").expect("fixture email"),
        role,
    }
}

/// `Authorization` header tuple for one of the test tokens.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Mock driving ports; tests set expectations on the ones they exercise.
#[derive(Default)]
pub struct MockPorts {
    pub auth: MockAuthService,
    pub horses: MockHorseService,
    pub stalls: MockStallService,
    pub stables: MockStableService,
    pub staff: MockStaffService,
    pub expenses: MockExpenseService,
    pub activities: MockHorseActivityService,
    pub events: MockEventService,
}

impl MockPorts {
    /// Ports whose auth service accepts [`USER_TOKEN`] and [`ADMIN_TOKEN`].
    pub fn accepting_tokens() -> Self {
        let mut ports = Self::default();
        ports.auth.expect_authenticate().returning(|token| match token {
            USER_TOKEN => Ok(claims(Role::User)),
            ADMIN_TOKEN => Ok(claims(Role::Admin)),
            _ => Err(crate::domain::Error::forbidden("Invalid or expired token")),
        });
        ports
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::from(HttpStatePorts {
            auth: Arc::new(self.auth),
            horses: Arc::new(self.horses),
            stalls: Arc::new(self.stalls),
            stables: Arc::new(self.stables),
            staff: Arc::new(self.staff),
            expenses: Arc::new(self.expenses),
            activities: Arc::new(self.activities),
            events: Arc::new(self.events),
        }))
    }
}
