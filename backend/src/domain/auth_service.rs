//! Account and sign-in domain service.
//!
//! Implements the [`AuthService`] driving port over the user repository and
//! the hashing, token and Google identity ports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AuthService, GoogleAuthorization, GoogleIdentity, GoogleIdentityError, PasswordHashError,
    PasswordHasher, TokenCodec, TokenError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AccessClaims, Error, GoogleProfile, LoginCredentials, NewUser, Registration, Role, SignedIn,
    User, UserId, Username,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const USERNAME_ATTEMPTS: u32 = 50;

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { message } => {
            Error::conflict(format!("user already exists: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Signing { message } => {
            Error::internal(format!("failed to sign access token: {message}"))
        }
        TokenError::Invalid { .. } | TokenError::Expired => {
            Error::forbidden("Invalid or expired token")
        }
    }
}

fn map_google_error(error: GoogleIdentityError) -> Error {
    match error {
        GoogleIdentityError::NotConfigured => {
            Error::service_unavailable("Google sign-in is not configured")
        }
        GoogleIdentityError::Upstream { message } => {
            Error::service_unavailable(format!("Google sign-in unavailable: {message}"))
        }
        GoogleIdentityError::Rejected { message } => {
            Error::invalid_request(format!("Google sign-in rejected: {message}"))
        }
    }
}

fn user_exists() -> Error {
    Error::invalid_request("User already exists").with_details(json!({ "code": "user_exists" }))
}

/// Authentication service implementing the [`AuthService`] driving port.
#[derive(Clone)]
pub struct AuthServiceImpl<U> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    google: Arc<dyn GoogleIdentity>,
}

impl<U> AuthServiceImpl<U> {
    /// Create a new service from its collaborators.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
        google: Arc<dyn GoogleIdentity>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            google,
        }
    }

    fn sign(&self, user: User) -> Result<SignedIn, Error> {
        let token = self
            .tokens
            .issue(&AccessClaims::for_user(&user))
            .map_err(map_token_error)?;
        Ok(SignedIn { user, token })
    }
}

impl<U> AuthServiceImpl<U>
where
    U: UserRepository,
{
    async fn free_username(&self, profile: &GoogleProfile) -> Result<Username, Error> {
        let display = profile
            .display_name
            .as_deref()
            .or_else(|| profile.email.as_ref().split('@').next())
            .unwrap_or_default();
        let candidates =
            std::iter::once(None).chain((1..=USERNAME_ATTEMPTS).map(Some));
        for suffix in candidates {
            let candidate = Username::derive_from(display, suffix);
            let taken = self
                .users
                .find_by_username(&candidate)
                .await
                .map_err(map_repository_error)?;
            if taken.is_none() {
                return Ok(candidate);
            }
        }
        Err(Error::conflict("could not derive a free username"))
    }

    async fn resolve_google_user(&self, profile: GoogleProfile) -> Result<User, Error> {
        if let Some(user) = self
            .users
            .find_by_google_id(&profile.google_id)
            .await
            .map_err(map_repository_error)?
        {
            return Ok(user);
        }

        if let Some(existing) = self
            .users
            .find_by_email(&profile.email)
            .await
            .map_err(map_repository_error)?
        {
            info!(user_id = %existing.id, "linking Google account to existing user");
            return self
                .users
                .link_google_id(existing.id, &profile.google_id)
                .await
                .map_err(map_repository_error)?
                .ok_or_else(|| Error::not_found(format!("user {} not found", existing.id)));
        }

        let username = self.free_username(&profile).await?;
        let user = self
            .users
            .create(&NewUser {
                email: profile.email,
                username,
                role: Role::User,
                password_hash: None,
                google_id: Some(profile.google_id),
            })
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id, "created account from Google sign-in");
        Ok(user)
    }
}

#[async_trait]
impl<U> AuthService for AuthServiceImpl<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let by_email = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_repository_error)?;
        let by_name = self
            .users
            .find_by_username(registration.username())
            .await
            .map_err(map_repository_error)?;
        if by_email.is_some() || by_name.is_some() {
            return Err(user_exists());
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let user = self
            .users
            .create(&NewUser {
                email: registration.email().clone(),
                username: registration.username().clone(),
                role: Role::User,
                password_hash: Some(password_hash),
                google_id: None,
            })
            .await
            .map_err(|err| match err {
                UserPersistenceError::Conflict { .. } => user_exists(),
                other => map_repository_error(other),
            })?;
        info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<SignedIn, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::invalid_request(INVALID_CREDENTIALS))?;
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(Error::invalid_request(INVALID_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(credentials.password(), hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            warn!(user_id = %user.id, "rejected login with wrong password");
            return Err(Error::invalid_request(INVALID_CREDENTIALS));
        }
        self.sign(user)
    }

    fn authenticate(&self, token: &str) -> Result<AccessClaims, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }

    async fn current_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    fn google_configured(&self) -> bool {
        self.google.is_configured()
    }

    fn google_authorization(&self) -> Result<GoogleAuthorization, Error> {
        self.google.authorize().map_err(map_google_error)
    }

    async fn google_sign_in(&self, code: &str, pkce_verifier: &str) -> Result<SignedIn, Error> {
        let profile = self
            .google
            .exchange(code, pkce_verifier)
            .await
            .map_err(map_google_error)?;
        let user = self.resolve_google_user(profile).await?;
        self.sign(user)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
