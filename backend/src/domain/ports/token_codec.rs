//! Port for issuing and verifying access tokens.

use crate::domain::{AccessClaims, AccessToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Token could not be signed.
        Signing { message: String } => "access token signing failed: {message}",
        /// Token signature, shape or claims were rejected.
        Invalid { message: String } => "access token is invalid: {message}",
        /// Token lifetime has elapsed.
        Expired => "access token has expired",
    }
}

/// Port for stateless bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token carrying `claims`.
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError>;

    /// Verify `token` and return its claims.
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}
