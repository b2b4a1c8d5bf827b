//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hashing, tokens, Google, weather) are
//! implemented by outbound adapters. Driving ports (`*Service`) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod event_repository;
mod event_service;
mod expense_repository;
mod expense_service;
mod google_identity;
mod horse_activity_repository;
mod horse_activity_service;
mod horse_repository;
mod horse_service;
mod password_hasher;
mod stable_repository;
mod stable_service;
mod staff_repository;
mod staff_service;
mod stall_repository;
mod stall_service;
mod token_codec;
mod user_repository;
mod weather_source;

pub use auth_service::AuthService;
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use event_repository::{EventRepository, EventRepositoryError};
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_service::EventService;
#[cfg(test)]
pub use event_service::MockEventService;
pub use expense_repository::{ExpenseRepository, ExpenseRepositoryError};
#[cfg(test)]
pub use expense_repository::MockExpenseRepository;
pub use expense_service::ExpenseService;
#[cfg(test)]
pub use expense_service::MockExpenseService;
pub use google_identity::{
    DisabledGoogleIdentity, GoogleAuthorization, GoogleIdentity, GoogleIdentityError,
};
#[cfg(test)]
pub use google_identity::MockGoogleIdentity;
pub use horse_activity_repository::{HorseActivityRepository, HorseActivityRepositoryError};
#[cfg(test)]
pub use horse_activity_repository::MockHorseActivityRepository;
pub use horse_activity_service::HorseActivityService;
#[cfg(test)]
pub use horse_activity_service::MockHorseActivityService;
pub use horse_repository::{HorseRepository, HorseRepositoryError};
#[cfg(test)]
pub use horse_repository::MockHorseRepository;
pub use horse_service::HorseService;
#[cfg(test)]
pub use horse_service::MockHorseService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use stable_repository::MockStableRepository;
pub use stable_repository::{StableRepository, StableRepositoryError};
#[cfg(test)]
pub use stable_service::MockStableService;
pub use stable_service::StableService;
#[cfg(test)]
pub use staff_repository::MockStaffRepository;
pub use staff_repository::{StaffRepository, StaffRepositoryError};
#[cfg(test)]
pub use staff_service::MockStaffService;
pub use staff_service::StaffService;
#[cfg(test)]
pub use stall_repository::MockStallRepository;
pub use stall_repository::{StallRepository, StallRepositoryError};
#[cfg(test)]
pub use stall_service::MockStallService;
pub use stall_service::StallService;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use weather_source::MockWeatherSource;
pub use weather_source::{DisabledWeatherSource, WeatherSource, WeatherSourceError};
