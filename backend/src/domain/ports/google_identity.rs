//! Port for Google sign-in.

use async_trait::async_trait;

use crate::domain::GoogleProfile;

use super::define_port_error;

define_port_error! {
    /// Errors raised by Google identity adapters.
    pub enum GoogleIdentityError {
        /// Google sign-in is not configured for this deployment.
        NotConfigured => "Google sign-in is not configured",
        /// Talking to Google failed.
        Upstream { message: String } => "Google sign-in failed: {message}",
        /// Google rejected the authorisation code.
        Rejected { message: String } => "Google rejected the sign-in: {message}",
    }
}

/// Authorisation redirect plus the values that must survive until callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleAuthorization {
    /// URL to redirect the browser to.
    pub url: String,
    /// CSRF state echoed back by Google.
    pub state: String,
    /// PKCE verifier paired with the challenge embedded in `url`.
    pub pkce_verifier: String,
}

/// Port for the Google OAuth 2.0 authorisation-code flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleIdentity: Send + Sync {
    /// Whether client credentials were supplied.
    fn is_configured(&self) -> bool;

    /// Build the authorisation redirect.
    fn authorize(&self) -> Result<GoogleAuthorization, GoogleIdentityError>;

    /// Exchange `code` and fetch the signed-in profile.
    async fn exchange(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<GoogleProfile, GoogleIdentityError>;
}

/// Identity adapter used when Google is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGoogleIdentity;

#[async_trait]
impl GoogleIdentity for DisabledGoogleIdentity {
    fn is_configured(&self) -> bool {
        false
    }

    fn authorize(&self) -> Result<GoogleAuthorization, GoogleIdentityError> {
        Err(GoogleIdentityError::not_configured())
    }

    async fn exchange(
        &self,
        _code: &str,
        _pkce_verifier: &str,
    ) -> Result<GoogleProfile, GoogleIdentityError> {
        Err(GoogleIdentityError::not_configured())
    }
}
