//! HS256 access tokens carrying `{sub, email, role, iat, exp}`.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{TokenCodec, TokenError};
use crate::domain::{AccessClaims, AccessToken, Email, Role, UserId};

/// Token lifetime used when none is configured.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// [`TokenCodec`] signing tokens with a shared secret.
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtCodec {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

fn invalid(message: impl Into<String>) -> TokenError {
    TokenError::invalid(message)
}

impl TokenCodec for JwtCodec {
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError> {
        let issued_at = self.clock.utc().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let payload = Claims {
            sub: claims.user_id.to_string(),
            email: claims.email.to_string(),
            role: claims.role.as_str().to_owned(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => invalid(err.to_string()),
            })?;
        let claims = data.claims;
        let user_id = Uuid::parse_str(&claims.sub)
            .map(UserId::from_uuid)
            .map_err(|_| invalid("subject is not a user id"))?;
        let email = Email::new(&claims.email).map_err(|err| invalid(err.to_string()))?;
        let role = Role::from_str(&claims.role).map_err(|err| invalid(err.to_string()))?;
        Ok(AccessClaims {
            user_id,
            email,
            role,
        })
    }
}
