//! Builders wiring repositories and credential adapters into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use stable_backend::domain::ports::{GoogleIdentity, PasswordHasher, TokenCodec, WeatherSource};
use stable_backend::domain::{
    AuthServiceImpl, EventServiceImpl, ExpenseServiceImpl, HorseActivityServiceImpl,
    HorseServiceImpl, StableServiceImpl, StaffServiceImpl, StallServiceImpl,
};
use stable_backend::example_data::ExampleDataSeeder;
use stable_backend::inbound::http::state::{HttpState, HttpStatePorts};
use stable_backend::outbound::memory::MemoryStore;
use stable_backend::outbound::persistence::{
    DbPool, DieselEventRepository, DieselExpenseRepository, DieselHorseActivityRepository,
    DieselHorseRepository, DieselStableRepository, DieselStaffRepository, DieselStallRepository,
    DieselUserRepository,
};

/// Where records live.
#[derive(Clone)]
pub enum Persistence {
    Postgres(DbPool),
    /// Process-local tables, lost on restart.
    Memory(MemoryStore),
}

/// Driven adapters shared by every backend.
#[derive(Clone)]
pub struct Adapters {
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenCodec>,
    pub google: Arc<dyn GoogleIdentity>,
    pub weather: Arc<dyn WeatherSource>,
    pub clock: Arc<dyn Clock>,
}

fn postgres_ports(pool: &DbPool, adapters: &Adapters) -> HttpStatePorts {
    HttpStatePorts {
        auth: Arc::new(AuthServiceImpl::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            adapters.hasher.clone(),
            adapters.tokens.clone(),
            adapters.google.clone(),
        )),
        horses: Arc::new(HorseServiceImpl::new(Arc::new(DieselHorseRepository::new(
            pool.clone(),
        )))),
        stalls: Arc::new(StallServiceImpl::new(Arc::new(DieselStallRepository::new(
            pool.clone(),
        )))),
        stables: Arc::new(StableServiceImpl::new(Arc::new(
            DieselStableRepository::new(pool.clone()),
        ))),
        staff: Arc::new(StaffServiceImpl::new(Arc::new(DieselStaffRepository::new(
            pool.clone(),
        )))),
        expenses: Arc::new(ExpenseServiceImpl::new(Arc::new(
            DieselExpenseRepository::new(pool.clone()),
        ))),
        activities: Arc::new(HorseActivityServiceImpl::new(Arc::new(
            DieselHorseActivityRepository::new(pool.clone()),
        ))),
        events: Arc::new(EventServiceImpl::new(
            Arc::new(DieselEventRepository::new(pool.clone())),
            adapters.weather.clone(),
            adapters.clock.clone(),
        )),
    }
}

fn memory_ports(store: &MemoryStore, adapters: &Adapters) -> HttpStatePorts {
    let store = Arc::new(store.clone());
    HttpStatePorts {
        auth: Arc::new(AuthServiceImpl::new(
            store.clone(),
            adapters.hasher.clone(),
            adapters.tokens.clone(),
            adapters.google.clone(),
        )),
        horses: Arc::new(HorseServiceImpl::new(store.clone())),
        stalls: Arc::new(StallServiceImpl::new(store.clone())),
        stables: Arc::new(StableServiceImpl::new(store.clone())),
        staff: Arc::new(StaffServiceImpl::new(store.clone())),
        expenses: Arc::new(ExpenseServiceImpl::new(store.clone())),
        activities: Arc::new(HorseActivityServiceImpl::new(store.clone())),
        events: Arc::new(EventServiceImpl::new(
            store,
            adapters.weather.clone(),
            adapters.clock.clone(),
        )),
    }
}

/// Build the shared HTTP state over the configured store.
pub(super) fn build_http_state(
    persistence: &Persistence,
    adapters: &Adapters,
    frontend_origin: &str,
) -> web::Data<HttpState> {
    let ports = match persistence {
        Persistence::Postgres(pool) => postgres_ports(pool, adapters),
        Persistence::Memory(store) => memory_ports(store, adapters),
    };
    web::Data::new(HttpState::new(ports, frontend_origin))
}

/// Seeder writing the demo data into the configured store.
pub fn example_data_seeder(persistence: &Persistence, adapters: &Adapters) -> ExampleDataSeeder {
    match persistence {
        Persistence::Postgres(pool) => ExampleDataSeeder::for_postgres(pool, adapters.hasher.clone()),
        Persistence::Memory(store) => ExampleDataSeeder::for_memory(store, adapters.hasher.clone()),
    }
}
