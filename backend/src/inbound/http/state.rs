//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthService, EventService, ExpenseService, HorseActivityService, HorseService, StableService,
    StaffService, StallService,
};

/// Origin the OAuth completion page posts its result to by default.
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Parameter object bundling all driving ports for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthService>,
    pub horses: Arc<dyn HorseService>,
    pub stalls: Arc<dyn StallService>,
    pub stables: Arc<dyn StableService>,
    pub staff: Arc<dyn StaffService>,
    pub expenses: Arc<dyn ExpenseService>,
    pub activities: Arc<dyn HorseActivityService>,
    pub events: Arc<dyn EventService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub horses: Arc<dyn HorseService>,
    pub stalls: Arc<dyn StallService>,
    pub stables: Arc<dyn StableService>,
    pub staff: Arc<dyn StaffService>,
    pub expenses: Arc<dyn ExpenseService>,
    pub activities: Arc<dyn HorseActivityService>,
    pub events: Arc<dyn EventService>,
    /// Origin allowed to receive the OAuth `postMessage` result.
    pub frontend_origin: String,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_FRONTEND_ORIGIN)
    }
}

impl HttpState {
    /// Construct state from the port bundle and the frontend origin.
    pub fn new(ports: HttpStatePorts, frontend_origin: impl Into<String>) -> Self {
        let HttpStatePorts {
            auth,
            horses,
            stalls,
            stables,
            staff,
            expenses,
            activities,
            events,
        } = ports;
        Self {
            auth,
            horses,
            stalls,
            stables,
            staff,
            expenses,
            activities,
            events,
            frontend_origin: frontend_origin.into(),
        }
    }
}
