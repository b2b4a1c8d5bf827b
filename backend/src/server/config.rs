//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use super::state_builders::{Adapters, Persistence};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) frontend_origin: String,
    pub(crate) persistence: Persistence,
    pub(crate) adapters: Adapters,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration over the chosen store and adapters.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        bind_addr: SocketAddr,
        persistence: Persistence,
        adapters: Adapters,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site: SameSite::Lax,
            bind_addr,
            cors_origins: Vec::new(),
            frontend_origin: stable_backend::inbound::http::state::DEFAULT_FRONTEND_ORIGIN
                .to_owned(),
            persistence,
            adapters,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Browser origins allowed by CORS.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Origin the OAuth popup posts its result to.
    #[must_use]
    pub fn with_frontend_origin(mut self, origin: impl Into<String>) -> Self {
        self.frontend_origin = origin.into();
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
