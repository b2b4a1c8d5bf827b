//! Demo data: two accounts, three stables, five stalls and two stabled
//! horses.
//!
//! Applied by the `seed-stable` binary against PostgreSQL, or at start-up
//! over the in-memory store when `STABLE_SEED_EXAMPLE_DATA` is set.

mod seed;

pub use seed::{ExampleDataSeeder, SeedOutcome, SeedReport, SeedingError};
