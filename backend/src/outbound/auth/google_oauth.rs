//! Google OAuth 2.0 authorisation-code flow with PKCE.
//!
//! [`GoogleOAuthIdentity::authorize`] builds the redirect (scopes `openid
//! email profile`, S256 challenge, random CSRF state). The caller keeps the
//! state and verifier until the callback, then
//! [`GoogleOAuthIdentity::exchange`] trades the code for an access token and
//! reads the userinfo profile.

use std::time::Duration;

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RequestTokenError, Scope, TokenResponse,
    TokenUrl,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::domain::ports::{GoogleAuthorization, GoogleIdentity, GoogleIdentityError};
use crate::domain::{Email, GoogleProfile};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const SCOPES: [&str; 3] = ["openid", "email", "profile"];

type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Credentials and endpoints for the Google client.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub timeout: Duration,
}

impl GoogleOAuthConfig {
    /// Configuration against Google's public endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
            auth_url: GOOGLE_AUTH_URL.to_owned(),
            token_url: GOOGLE_TOKEN_URL.to_owned(),
            userinfo_url: GOOGLE_USERINFO_URL.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Failure to build the Google adapter from configuration.
#[derive(Debug, thiserror::Error)]
pub enum GoogleSetupError {
    #[error("invalid Google OAuth URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct UserInfoDto {
    id: String,
    email: String,
    #[serde(default)]
    verified_email: Option<bool>,
    #[serde(default)]
    name: Option<String>,
}

/// [`GoogleIdentity`] backed by Google's OAuth and userinfo endpoints.
pub struct GoogleOAuthIdentity {
    client: ConfiguredClient,
    http: Client,
    userinfo_url: Url,
}

impl GoogleOAuthIdentity {
    /// Build the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`GoogleSetupError`] when a URL does not parse or the HTTP
    /// client cannot be built.
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, GoogleSetupError> {
        let client = BasicClient::new(ClientId::new(config.client_id))
            .set_client_secret(ClientSecret::new(config.client_secret))
            .set_auth_uri(AuthUrl::new(config.auth_url)?)
            .set_token_uri(TokenUrl::new(config.token_url)?)
            .set_redirect_uri(RedirectUrl::new(config.redirect_url)?);
        // Token endpoints must not follow redirects.
        let http = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            http,
            userinfo_url: Url::parse(&config.userinfo_url)?,
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserInfoDto, GoogleIdentityError> {
        let response = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| GoogleIdentityError::upstream(err.without_url().to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GoogleIdentityError::upstream(format!(
                "userinfo responded with {}",
                status.as_u16()
            )));
        }
        response
            .json()
            .await
            .map_err(|err| GoogleIdentityError::upstream(format!("invalid userinfo: {err}")))
    }
}

fn into_profile(info: UserInfoDto) -> Result<GoogleProfile, GoogleIdentityError> {
    if info.verified_email == Some(false) {
        return Err(GoogleIdentityError::rejected("Google e-mail is not verified"));
    }
    let email = Email::new(&info.email)
        .map_err(|err| GoogleIdentityError::rejected(format!("Google e-mail {err}")))?;
    Ok(GoogleProfile {
        google_id: info.id,
        email,
        display_name: info.name.filter(|name| !name.trim().is_empty()),
    })
}

#[async_trait]
impl GoogleIdentity for GoogleOAuthIdentity {
    fn is_configured(&self) -> bool {
        true
    }

    fn authorize(&self) -> Result<GoogleAuthorization, GoogleIdentityError> {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(SCOPES.map(|scope| Scope::new(scope.to_owned())))
            .set_pkce_challenge(challenge)
            .url();
        Ok(GoogleAuthorization {
            url: url.to_string(),
            state: state.secret().clone(),
            pkce_verifier: verifier.secret().clone(),
        })
    }

    async fn exchange(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<GoogleProfile, GoogleIdentityError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_owned()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_owned()))
            .request_async(&self.http)
            .await
            .map_err(|err| match err {
                RequestTokenError::ServerResponse(response) => {
                    GoogleIdentityError::rejected(response.error().to_string())
                }
                other => GoogleIdentityError::upstream(other.to_string()),
            })?;
        debug!("exchanged Google authorisation code");
        let info = self.fetch_profile(token.access_token().secret()).await?;
        into_profile(info)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn identity() -> GoogleOAuthIdentity {
        GoogleOAuthIdentity::new(GoogleOAuthConfig::new(
            "client-123",
            "secret",
            "http://localhost:5000/oauth/google/callback",
        ))
        .expect("valid config")
    }

    #[rstest]
    fn authorize_builds_pkce_redirect() {
        let auth = identity().authorize().expect("authorisation url");
        let url = Url::parse(&auth.url).expect("absolute url");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let find = |key: &str| {
            query
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(find("client_id").as_deref(), Some("client-123"));
        assert_eq!(find("scope").as_deref(), Some("openid email profile"));
        assert_eq!(find("code_challenge_method").as_deref(), Some("S256"));
        assert_eq!(find("state"), Some(auth.state));
        assert!(!auth.pkce_verifier.is_empty());
    }

    #[rstest]
    fn unverified_email_is_rejected() {
        let err = into_profile(UserInfoDto {
            id: "g-1".into(),
            email: "ada@example.com".into(),
            verified_email: Some(false),
            name: None,
        })
        .expect_err("unverified");
        assert!(matches!(err, GoogleIdentityError::Rejected { .. }));
    }

    #[rstest]
    fn blank_names_are_dropped() {
        let profile = into_profile(UserInfoDto {
            id: "g-1".into(),
            email: "Ada@Example.com".into(),
            verified_email: Some(true),
            name: Some("  ".into()),
        })
        .expect("valid profile");
        assert_eq!(profile.email.as_ref(), "ada@example.com");
        assert_eq!(profile.display_name, None);
    }

    #[rstest]
    fn invalid_redirect_fails_setup() {
        let result = GoogleOAuthIdentity::new(GoogleOAuthConfig::new("id", "secret", "not a url"));
        assert!(matches!(result, Err(GoogleSetupError::Url(_))));
    }
}
