//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local repositories for development and tests
//! - **auth**: Argon2 hashing, JWT codec and Google OAuth
//! - **weather**: OpenWeatherMap forecast client
//!
//! Adapters only translate between domain types and infrastructure
//! representations; the rules they enforce come from the domain.

pub mod auth;
pub mod memory;
pub mod persistence;
pub mod weather;
