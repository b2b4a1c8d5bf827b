//! Process settings loaded via OrthoConfig from CLI flags, `STABLE_*`
//! environment variables and configuration files.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use stable_backend::outbound::auth::GoogleOAuthConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
const DEFAULT_WEATHER_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Settings for the API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STABLE")]
pub struct StableSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// HMAC secret for access tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime.
    pub jwt_ttl_seconds: Option<u64>,
    /// Comma separated list of browser origins allowed by CORS.
    pub cors_origins: Option<String>,
    /// Origin receiving the OAuth popup's `postMessage`.
    pub frontend_origin: Option<String>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_redirect_url: Option<String>,
    /// OpenWeatherMap API key; weather lookups answer `503` without it.
    pub weather_api_key: Option<String>,
    /// Forecast endpoint override.
    pub weather_base_url: Option<String>,
    pub weather_timeout_seconds: Option<u64>,
    /// File holding the cookie session key material.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key in release builds.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Apply the demo data at start-up.
    #[ortho_config(default = false)]
    pub seed_example_data: bool,
}

impl StableSettings {
    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        format!("{host}:{port}").parse()
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS))
    }

    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(
            self.weather_timeout_seconds
                .unwrap_or(DEFAULT_WEATHER_TIMEOUT_SECONDS),
        )
    }

    /// Configured CORS origins, or the local frontend defaults.
    pub fn cors_origins(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .cors_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();
        if configured.is_empty() {
            DEFAULT_CORS_ORIGINS.map(str::to_owned).to_vec()
        } else {
            configured
        }
    }

    pub fn frontend_origin(&self) -> &str {
        self.frontend_origin
            .as_deref()
            .unwrap_or(stable_backend::inbound::http::state::DEFAULT_FRONTEND_ORIGIN)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Google client settings when the id, secret and redirect URL are all
    /// present.
    pub fn google(&self) -> Option<GoogleOAuthConfig> {
        match (
            self.google_client_id.as_deref(),
            self.google_client_secret.as_deref(),
            self.google_redirect_url.as_deref(),
        ) {
            (Some(id), Some(secret), Some(redirect)) => {
                Some(GoogleOAuthConfig::new(id, secret, redirect))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "STABLE_HOST",
        "STABLE_PORT",
        "STABLE_DATABASE_URL",
        "STABLE_CORS_ORIGINS",
        "STABLE_COOKIE_SECURE",
        "STABLE_GOOGLE_CLIENT_ID",
        "STABLE_GOOGLE_CLIENT_SECRET",
        "STABLE_GOOGLE_REDIRECT_URL",
    ];

    fn load() -> StableSettings {
        StableSettings::load_from_iter([OsString::from("stable-backend")])
            .expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared());
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("addr"),
            "0.0.0.0:5000".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.cookie_secure);
        assert!(settings.run_migrations);
        assert_eq!(
            settings.cors_origins(),
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(settings.token_ttl(), Duration::from_secs(3600));
        assert!(settings.google().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let mut vars = cleared();
        vars.retain(|(name, _)| !matches!(*name, "STABLE_PORT" | "STABLE_CORS_ORIGINS"));
        vars.push(("STABLE_PORT", Some("8081".to_owned())));
        vars.push((
            "STABLE_CORS_ORIGINS",
            Some("https://stable.example, https://admin.stable.example".to_owned()),
        ));
        let _guard = lock_env(vars);

        let settings = load();
        assert_eq!(settings.bind_addr().expect("addr").port(), 8081);
        assert_eq!(
            settings.cors_origins(),
            vec!["https://stable.example", "https://admin.stable.example"]
        );
    }

    #[rstest]
    fn google_needs_all_three_values() {
        let mut vars = cleared();
        vars.retain(|(name, _)| !name.starts_with("STABLE_GOOGLE"));
        vars.push(("STABLE_GOOGLE_CLIENT_ID", Some("client".to_owned())));
        vars.push(("STABLE_GOOGLE_CLIENT_SECRET", Some("secret".to_owned())));
        vars.push(("STABLE_GOOGLE_REDIRECT_URL", None));
        let _guard = lock_env(vars);
        assert!(load().google().is_none());
    }
}
