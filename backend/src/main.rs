//! Backend entry-point: loads settings, picks the store and serves the API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::web;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
use zeroize::Zeroizing;

use stable_backend::domain::ports::{
    DisabledGoogleIdentity, DisabledWeatherSource, GoogleIdentity, WeatherSource,
};
use stable_backend::example_data::SeedOutcome;
use stable_backend::inbound::http::health::HealthState;
use stable_backend::outbound::auth::{Argon2Hasher, GoogleOAuthIdentity, JwtCodec};
use stable_backend::outbound::memory::MemoryStore;
use stable_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use stable_backend::outbound::weather::{DEFAULT_FORECAST_URL, OpenWeatherSource};

use server::{Adapters, Persistence, ServerConfig, StableSettings, create_server, example_data_seeder};

const SESSION_KEY_MIN_BYTES: usize = 32;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = StableSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let key = session_key(&settings)?;
    let adapters = build_adapters(&settings, clock.clone())?;
    let persistence = build_persistence(&settings, clock.clone()).await?;

    if settings.seed_example_data {
        let today = clock.utc().date_naive();
        match example_data_seeder(&persistence, &adapters).seed(today).await {
            Ok(SeedOutcome::Applied(report)) => info!(?report, "example data seeded"),
            Ok(SeedOutcome::AlreadySeeded) => info!("example data already present"),
            Err(err) => return Err(io::Error::other(format!("example data seeding failed: {err}"))),
        }
    }

    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::other(format!("invalid bind address: {err}")))?;
    let config = ServerConfig::new(key, settings.cookie_secure, bind_addr, persistence, adapters)
        .with_cors_origins(settings.cors_origins())
        .with_frontend_origin(settings.frontend_origin());
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting stable manager API");
    create_server(health_state, config)?.await
}

fn session_key(settings: &StableSettings) -> io::Result<Key> {
    let key_path = settings.session_key_file();
    match std::fs::read(&key_path) {
        Ok(bytes) if bytes.len() >= SESSION_KEY_MIN_BYTES => {
            Ok(Key::derive_from(&Zeroizing::new(bytes)))
        }
        Ok(_) => Err(io::Error::other(format!(
            "session key at {} must hold at least {SESSION_KEY_MIN_BYTES} bytes",
            key_path.display()
        ))),
        Err(e) => {
            if cfg!(debug_assertions) || settings.session_allow_ephemeral {
                warn!(path = %key_path.display(), error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    key_path.display()
                )))
            }
        }
    }
}

fn jwt_secret(settings: &StableSettings) -> io::Result<Zeroizing<Vec<u8>>> {
    if let Some(secret) = settings.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
        return Ok(Zeroizing::new(secret.as_bytes().to_vec()));
    }
    if cfg!(debug_assertions) {
        warn!("STABLE_JWT_SECRET unset; tokens will not survive a restart (dev only)");
        Ok(Zeroizing::new(rand::random::<[u8; 32]>().to_vec()))
    } else {
        Err(io::Error::other("STABLE_JWT_SECRET must be set"))
    }
}

fn build_adapters(settings: &StableSettings, clock: Arc<dyn Clock>) -> io::Result<Adapters> {
    let secret = jwt_secret(settings)?;
    let google: Arc<dyn GoogleIdentity> = match settings.google() {
        Some(config) => Arc::new(GoogleOAuthIdentity::new(config).map_err(io::Error::other)?),
        None => {
            info!("Google sign-in disabled");
            Arc::new(DisabledGoogleIdentity)
        }
    };
    let weather: Arc<dyn WeatherSource> = match settings.weather_api_key.as_deref() {
        Some(api_key) => {
            let endpoint = Url::parse(
                settings
                    .weather_base_url
                    .as_deref()
                    .unwrap_or(DEFAULT_FORECAST_URL),
            )
            .map_err(|err| io::Error::other(format!("invalid weather URL: {err}")))?;
            Arc::new(
                OpenWeatherSource::new(endpoint, api_key, settings.weather_timeout())
                    .map_err(io::Error::other)?,
            )
        }
        None => {
            warn!("STABLE_WEATHER_API_KEY unset; event weather is unavailable");
            Arc::new(DisabledWeatherSource)
        }
    };
    Ok(Adapters {
        hasher: Arc::new(Argon2Hasher),
        tokens: Arc::new(JwtCodec::new(&secret, settings.token_ttl(), clock.clone())),
        google,
        weather,
        clock,
    })
}

async fn build_persistence(
    settings: &StableSettings,
    clock: Arc<dyn Clock>,
) -> io::Result<Persistence> {
    let Some(url) = settings.database_url.as_deref() else {
        warn!("STABLE_DATABASE_URL unset; using the in-memory store");
        return Ok(Persistence::Memory(MemoryStore::new(clock)));
    };
    if settings.run_migrations {
        run_pending_migrations(url.to_owned())
            .await
            .map_err(io::Error::other)?;
    }
    let mut pool_config = PoolConfig::new(url);
    if let Some(max) = settings.db_max_connections {
        pool_config = pool_config.with_max_size(max);
    }
    let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;
    Ok(Persistence::Postgres(pool))
}
