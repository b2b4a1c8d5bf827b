//! PostgreSQL adapters for the repository ports, built on Diesel.
//!
//! Row structs and the `table!` schema stay private to this module; every
//! read is rebuilt through the domain validators so a corrupt row surfaces
//! as a query error instead of leaking into a response. Stall and stable
//! rules run inside transactions holding row locks.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let horses = DieselHorseRepository::new(pool.clone());
//! ```

mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_expense_repository;
mod diesel_horse_activity_repository;
mod diesel_horse_repository;
mod diesel_stable_repository;
mod diesel_staff_repository;
mod diesel_stall_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use diesel_expense_repository::DieselExpenseRepository;
pub use diesel_horse_activity_repository::DieselHorseActivityRepository;
pub use diesel_horse_repository::DieselHorseRepository;
pub use diesel_stable_repository::DieselStableRepository;
pub use diesel_staff_repository::DieselStaffRepository;
pub use diesel_stall_repository::DieselStallRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
