//! Stable manager backend library.
//!
//! - [`domain`]: entities, validation and services
//! - [`inbound`]: the actix-web HTTP adapter
//! - [`outbound`]: PostgreSQL, in-memory, credential and weather adapters

pub mod doc;
pub mod domain;
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
