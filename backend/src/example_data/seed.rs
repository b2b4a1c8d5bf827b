//! Seeder applying the demo data through the domain services.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    HorseService, PasswordHasher, StableService, StallService, UserRepository,
};
use crate::domain::{
    Email, Error, HorseDraft, HorseServiceImpl, NewUser, Role, StableDraft, StableId,
    StableServiceImpl, Stall, StallDraft, StallServiceImpl, StallStatus, User, Username,
};
use crate::outbound::memory::MemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselHorseRepository, DieselStableRepository, DieselStallRepository,
    DieselUserRepository,
};

const ADMIN_EMAIL: &str = "admin@example.com";

/// Failure while applying the demo data.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// A domain service rejected a record.
    #[error("seed record rejected: {0}")]
    Domain(#[from] Error),
    /// The user repository failed.
    #[error("seed user could not be stored: {0}")]
    Users(String),
}

/// Counts of records written by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub stables: usize,
    pub stalls: usize,
    pub horses: usize,
}

/// Result of [`ExampleDataSeeder::seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Applied(SeedReport),
    /// The admin account exists already; nothing was written.
    AlreadySeeded,
}

struct SeedUser {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

const USERS: [SeedUser; 2] = [
    SeedUser {
        username: "adminUser",
        email: ADMIN_EMAIL,
        password: "admin123",
        role: Role::Admin,
    },
    SeedUser {
        username: "staffUser",
        email: "staff@example.com",
        password: "staff123",
        role: Role::User,
    },
];

/// Writes the demo data through the same services the HTTP layer uses, so
/// every record passes the usual validation and stall rules.
pub struct ExampleDataSeeder {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    stables: Arc<dyn StableService>,
    stalls: Arc<dyn StallService>,
    horses: Arc<dyn HorseService>,
}

impl ExampleDataSeeder {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        stables: Arc<dyn StableService>,
        stalls: Arc<dyn StallService>,
        horses: Arc<dyn HorseService>,
    ) -> Self {
        Self {
            users,
            hasher,
            stables,
            stalls,
            horses,
        }
    }

    /// Seeder writing through the PostgreSQL repositories.
    pub fn for_postgres(pool: &DbPool, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            hasher,
            Arc::new(StableServiceImpl::new(Arc::new(DieselStableRepository::new(
                pool.clone(),
            )))),
            Arc::new(StallServiceImpl::new(Arc::new(DieselStallRepository::new(
                pool.clone(),
            )))),
            Arc::new(HorseServiceImpl::new(Arc::new(DieselHorseRepository::new(
                pool.clone(),
            )))),
        )
    }

    /// Seeder writing into a shared in-memory store.
    pub fn for_memory(store: &MemoryStore, hasher: Arc<dyn PasswordHasher>) -> Self {
        let store = Arc::new(store.clone());
        Self::new(
            store.clone(),
            hasher,
            Arc::new(StableServiceImpl::new(store.clone())),
            Arc::new(StallServiceImpl::new(store.clone())),
            Arc::new(HorseServiceImpl::new(store)),
        )
    }

    /// Apply the demo data unless the admin account already exists.
    ///
    /// `today` anchors the horses' birth dates.
    pub async fn seed(&self, today: NaiveDate) -> Result<SeedOutcome, SeedingError> {
        let admin_email = Email::new(ADMIN_EMAIL).map_err(|err| SeedingError::Users(err.to_string()))?;
        let existing = self
            .users
            .find_by_email(&admin_email)
            .await
            .map_err(|err| SeedingError::Users(err.to_string()))?;
        if existing.is_some() {
            info!(email = ADMIN_EMAIL, "example data already present; skipping");
            return Ok(SeedOutcome::AlreadySeeded);
        }

        let mut accounts = Vec::with_capacity(USERS.len());
        for seed in &USERS {
            accounts.push(self.create_user(seed).await?);
        }
        let [admin, staff] = [&accounts[0], &accounts[1]];

        let sunset = self
            .stable("Sunset Meadows", "Valley View", 20, "Scenic and spacious stables.", "large", admin)
            .await?;
        let green = self
            .stable(
                "Green Pastures",
                "Hilltop Ranch",
                15,
                "Quiet and serene environment for horses.",
                "medium",
                admin,
            )
            .await?;
        let north = self
            .stable("North Ridge", "Mountain Trail", 10, "Cozy stables with access to trails.", "medium", staff)
            .await?;

        self.stall("1", "Sunset Meadows", "large", sunset, None).await?;
        let spirit_stall = self.stall("2", "Sunset Meadows", "large", sunset, None).await?;
        self.stall("3", "Sunset Meadows", "large", sunset, Some(StallStatus::Maintenance))
            .await?;
        let comet_stall = self.stall("1", "Green Pastures", "medium", green, None).await?;
        self.stall("1", "North Ridge", "medium", north, None).await?;

        let horses = [
            (
                "Spirit",
                "Mustang",
                5,
                admin,
                "Special Needs: None. Feed Instructions: Standard feed twice a day. Medications: None.",
                spirit_stall,
            ),
            (
                "Comet",
                "Thoroughbred",
                7,
                staff,
                "Special Needs: Requires daily leg wraps. Feed Instructions: High-protein feed. Medications: Daily joint supplement.",
                comet_stall,
            ),
        ];
        let horse_count = horses.len();
        for (name, breed, years, owner, notes, stall) in horses {
            let horse = self
                .horses
                .create(HorseDraft {
                    name: name.to_owned(),
                    breed: Some(breed.to_owned()),
                    owner: Some(owner.username.to_string()),
                    owner_email: owner.email.as_ref().to_owned(),
                    birth_date: today.checked_sub_months(Months::new(years * 12)),
                    notes: Some(notes.to_owned()),
                    ..HorseDraft::default()
                })
                .await?;
            self.stalls.assign(stall.id, horse.id).await?;
        }

        let report = SeedReport {
            users: accounts.len(),
            stables: 3,
            stalls: 5,
            horses: horse_count,
        };
        info!(
            users = report.users,
            stables = report.stables,
            stalls = report.stalls,
            horses = report.horses,
            "example data applied"
        );
        Ok(SeedOutcome::Applied(report))
    }

    async fn create_user(&self, seed: &SeedUser) -> Result<User, SeedingError> {
        let invalid = |err: String| SeedingError::Users(format!("{}: {err}", seed.email));
        let password_hash = self
            .hasher
            .hash(seed.password)
            .await
            .map_err(|err| invalid(err.to_string()))?;
        self.users
            .create(&NewUser {
                email: Email::new(seed.email).map_err(|err| invalid(err.to_string()))?,
                username: Username::new(seed.username).map_err(|err| invalid(err.to_string()))?,
                role: seed.role,
                password_hash: Some(password_hash),
                google_id: None,
            })
            .await
            .map_err(|err| invalid(err.to_string()))
    }

    async fn stable(
        &self,
        full_name: &str,
        location: &str,
        capacity: i64,
        description: &str,
        stall_size: &str,
        manager: &User,
    ) -> Result<StableId, SeedingError> {
        let stable = self
            .stables
            .create(StableDraft {
                full_name: full_name.to_owned(),
                location: Some(location.to_owned()),
                capacity,
                description: Some(description.to_owned()),
                stall_size: Some(stall_size.to_owned()),
                managed_by: Some(manager.id),
            })
            .await?;
        Ok(stable.id)
    }

    async fn stall(
        &self,
        number: &str,
        stable_name: &str,
        size: &str,
        stable_id: StableId,
        status: Option<StallStatus>,
    ) -> Result<Stall, SeedingError> {
        Ok(self
            .stalls
            .create(StallDraft {
                number: number.to_owned(),
                name: Some(format!("{number}-{stable_name}")),
                size: size.to_owned(),
                stable_id: Some(stable_id),
                status,
            })
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use mockable::DefaultClock;
    use rstest::rstest;

    use super::*;
    use crate::domain::{HorseFilter, StallFilter};
    use crate::outbound::auth::Argon2Hasher;

    fn seeder(store: &MemoryStore) -> ExampleDataSeeder {
        ExampleDataSeeder::for_memory(store, Arc::new(Argon2Hasher))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 9).expect("date")
    }

    #[rstest]
    #[tokio::test]
    async fn applies_demo_data_once() {
        let store = MemoryStore::new(Arc::new(DefaultClock));
        let seeder = seeder(&store);

        let outcome = seeder.seed(today()).await.expect("seed applies");
        assert_eq!(
            outcome,
            SeedOutcome::Applied(SeedReport {
                users: 2,
                stables: 3,
                stalls: 5,
                horses: 2,
            })
        );
        let again = seeder.seed(today()).await.expect("second run");
        assert_eq!(again, SeedOutcome::AlreadySeeded);
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_horses_hold_their_stalls() {
        let store = MemoryStore::new(Arc::new(DefaultClock));
        seeder(&store).seed(today()).await.expect("seed applies");

        let stalls = StallServiceImpl::new(Arc::new(store.clone()));
        let occupied = stalls
            .list(StallFilter {
                status: Some(StallStatus::Occupied),
                ..StallFilter::default()
            })
            .await
            .expect("list stalls");
        assert_eq!(occupied.len(), 2);

        let horses = HorseServiceImpl::new(Arc::new(store))
            .list(HorseFilter::default())
            .await
            .expect("list horses");
        assert!(horses.iter().all(|horse| horse.stall_id().is_some()));
        let spirit = horses
            .iter()
            .find(|horse| horse.profile.name() == "Spirit")
            .expect("spirit");
        assert_eq!(spirit.profile.birth_date(), NaiveDate::from_ymd_opt(2020, 6, 9));
    }
}
