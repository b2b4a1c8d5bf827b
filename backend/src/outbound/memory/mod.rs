//! In-process repositories backed by a single mutex-guarded table set.
//!
//! Used when no database URL is configured and by the HTTP integration tests.
//! Every operation holds the table lock for its whole duration, so the stall
//! rules are checked and applied atomically just like the PostgreSQL
//! adapters do inside a transaction.

mod records;
mod stalls;
mod users;

use std::sync::Arc;

use mockable::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    Event, Expense, Horse, HorseActivity, Stable, Staff, Stall, StallPlacement, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    horses: Vec<Horse>,
    stalls: Vec<Stall>,
    stables: Vec<Stable>,
    staff: Vec<Staff>,
    expenses: Vec<Expense>,
    events: Vec<Event>,
    activities: Vec<HorseActivity>,
}

impl Tables {
    /// Horse with its placement derived from the stall table.
    fn horse_view(&self, horse: &Horse) -> Horse {
        let placement = self
            .stalls
            .iter()
            .find(|stall| stall.horse_id == Some(horse.id))
            .map(|stall| StallPlacement {
                stall_id: stall.id,
                number: stall.spec.number().to_owned(),
                name: stall.spec.name().map(str::to_owned),
                size: stall.spec.size().to_owned(),
                stable_id: stall.spec.stable_id(),
            });
        Horse {
            placement,
            ..horse.clone()
        }
    }

    /// Stable with its stall ids derived from the stall table.
    fn stable_view(&self, stable: &Stable) -> Stable {
        Stable {
            stall_ids: self
                .stalls
                .iter()
                .filter(|stall| stall.spec.stable_id() == Some(stable.id))
                .map(|stall| stall.id)
                .collect(),
            ..stable.clone()
        }
    }
}

/// Memory-backed implementation of every repository port.
///
/// Clones share the same tables.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create an empty store stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            clock,
        }
    }
}
