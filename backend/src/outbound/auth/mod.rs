//! Credential adapters: password hashing, bearer tokens and Google sign-in.

mod argon2_hasher;
mod google_oauth;
mod jwt_codec;

pub use argon2_hasher::Argon2Hasher;
pub use google_oauth::{GoogleOAuthConfig, GoogleOAuthIdentity, GoogleSetupError};
pub use jwt_codec::{DEFAULT_TOKEN_TTL, JwtCodec};
