//! Driving port for account and sign-in use-cases.
//!
//! Inbound adapters call it to register, sign in and resolve bearer tokens
//! without importing the hashing, token or persistence infrastructure.

use async_trait::async_trait;

use crate::domain::{AccessClaims, Error, LoginCredentials, Registration, SignedIn, User, UserId};

use super::GoogleAuthorization;

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a password account with the `user` role.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;

    /// Check credentials and issue an access token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SignedIn, Error>;

    /// Verify a bearer token and return its claims.
    fn authenticate(&self, token: &str) -> Result<AccessClaims, Error>;

    /// Load the account behind an authenticated request.
    async fn current_user(&self, id: UserId) -> Result<User, Error>;

    /// Start the Google authorisation-code flow.
    /// Whether Google sign-in is available at all.
    fn google_configured(&self) -> bool;

    fn google_authorization(&self) -> Result<GoogleAuthorization, Error>;

    /// Finish the Google flow, creating or linking the account.
    async fn google_sign_in(&self, code: &str, pkce_verifier: &str) -> Result<SignedIn, Error>;
}
