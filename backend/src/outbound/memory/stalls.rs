//! Horses, stalls and stables, including the assignment workflow.

use async_trait::async_trait;

use crate::domain::ports::{
    HorseRepository, HorseRepositoryError, StableRepository, StableRepositoryError,
    StallRepository, StallRepositoryError,
};
use crate::domain::{
    Assignment, EventDetails, Horse, HorseFilter, HorseId, HorseProfile, Stable, StableId,
    StableProfile, Stall, StallFilter, StallId, StallSpec, StallStatus, StallRuleError,
    check_assignment, check_capacity, check_removable, check_stable_room, resolve_status,
};

use super::{MemoryStore, Tables};

fn rule(rule: StallRuleError) -> StallRepositoryError {
    StallRepositoryError::rule(rule)
}

impl Tables {
    fn stall_index(&self, id: StallId) -> Result<usize, StallRepositoryError> {
        self.stalls
            .iter()
            .position(|stall| stall.id == id)
            .ok_or_else(StallRepositoryError::missing_stall)
    }

    /// Check that `spec` may live in its stable next to the other stalls.
    ///
    /// `moving` is the stall being edited, excluded from the counts. Numbers
    /// are only unique inside a stable; detached stalls never collide.
    fn check_placement(
        &self,
        spec: &StallSpec,
        moving: Option<StallId>,
    ) -> Result<(), StallRepositoryError> {
        let others = || {
            self.stalls
                .iter()
                .filter(move |stall| Some(stall.id) != moving)
        };
        let Some(stable_id) = spec.stable_id() else {
            return Ok(());
        };
        if others().any(|stall| {
            stall.spec.stable_id() == Some(stable_id) && stall.spec.number() == spec.number()
        }) {
            return Err(StallRepositoryError::conflict(spec.number()));
        }
        let stable = self
            .stables
            .iter()
            .find(|stable| stable.id == stable_id)
            .ok_or_else(StallRepositoryError::missing_stable)?;
        let already_inside = moving.is_some_and(|id| {
            self.stalls
                .iter()
                .any(|stall| stall.id == id && stall.spec.stable_id() == Some(stable_id))
        });
        if already_inside {
            return Ok(());
        }
        let count = others()
            .filter(|stall| stall.spec.stable_id() == Some(stable_id))
            .count();
        check_stable_room(stable.profile.capacity(), count).map_err(rule)
    }
}

#[async_trait]
impl StallRepository for MemoryStore {
    async fn list(&self, filter: &StallFilter) -> Result<Vec<Stall>, StallRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .stalls
            .iter()
            .filter(|stall| filter.matches(stall))
            .cloned()
            .collect())
    }

    async fn find(&self, id: StallId) -> Result<Option<Stall>, StallRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.stalls.iter().find(|stall| stall.id == id).cloned())
    }

    async fn create(
        &self,
        spec: &StallSpec,
        status: StallStatus,
    ) -> Result<Stall, StallRepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.check_placement(spec, None)?;
        let now = self.clock.utc();
        let stall = Stall {
            id: StallId::random(),
            spec: spec.clone(),
            status,
            horse_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.stalls.push(stall.clone());
        Ok(stall)
    }

    async fn update(
        &self,
        id: StallId,
        spec: &StallSpec,
        requested_status: Option<StallStatus>,
    ) -> Result<Stall, StallRepositoryError> {
        let mut tables = self.tables.lock().await;
        let index = tables.stall_index(id)?;
        let status = resolve_status(&tables.stalls[index], requested_status).map_err(rule)?;
        tables.check_placement(spec, Some(id))?;
        let now = self.clock.utc();
        let stall = &mut tables.stalls[index];
        stall.spec = spec.clone();
        stall.status = status;
        stall.updated_at = now;
        Ok(stall.clone())
    }

    async fn delete(&self, id: StallId) -> Result<Stall, StallRepositoryError> {
        let mut tables = self.tables.lock().await;
        let index = tables.stall_index(id)?;
        check_removable(&tables.stalls[index]).map_err(rule)?;
        Ok(tables.stalls.remove(index))
    }

    async fn assign(&self, id: StallId, horse_id: HorseId) -> Result<Stall, StallRepositoryError> {
        let mut tables = self.tables.lock().await;
        let index = tables.stall_index(id)?;
        if !tables.horses.iter().any(|horse| horse.id == horse_id) {
            return Err(StallRepositoryError::missing_horse());
        }
        if check_assignment(&tables.stalls[index], horse_id).map_err(rule)?
            == Assignment::AlreadyAssigned
        {
            return Ok(tables.stalls[index].clone());
        }
        let now = self.clock.utc();
        for previous in tables
            .stalls
            .iter_mut()
            .filter(|stall| stall.horse_id == Some(horse_id))
        {
            previous.horse_id = None;
            previous.status = StallStatus::Available;
            previous.updated_at = now;
        }
        let stall = &mut tables.stalls[index];
        stall.horse_id = Some(horse_id);
        stall.status = StallStatus::Occupied;
        stall.updated_at = now;
        Ok(stall.clone())
    }

    async fn release(&self, id: StallId) -> Result<Stall, StallRepositoryError> {
        let mut tables = self.tables.lock().await;
        let index = tables.stall_index(id)?;
        let now = self.clock.utc();
        let stall = &mut tables.stalls[index];
        if stall.horse_id.take().is_some() {
            stall.status = StallStatus::Available;
            stall.updated_at = now;
        }
        Ok(stall.clone())
    }
}

#[async_trait]
impl HorseRepository for MemoryStore {
    async fn list(&self, filter: &HorseFilter) -> Result<Vec<Horse>, HorseRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .horses
            .iter()
            .filter(|horse| {
                filter
                    .owner_email
                    .as_ref()
                    .is_none_or(|email| horse.profile.owner_email() == email)
            })
            .map(|horse| tables.horse_view(horse))
            .collect())
    }

    async fn find(&self, id: HorseId) -> Result<Option<Horse>, HorseRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .horses
            .iter()
            .find(|horse| horse.id == id)
            .map(|horse| tables.horse_view(horse)))
    }

    async fn create(&self, profile: &HorseProfile) -> Result<Horse, HorseRepositoryError> {
        let mut tables = self.tables.lock().await;
        let now = self.clock.utc();
        let horse = Horse {
            id: HorseId::random(),
            profile: profile.clone(),
            placement: None,
            created_at: now,
            updated_at: now,
        };
        tables.horses.push(horse.clone());
        Ok(horse)
    }

    async fn update(
        &self,
        id: HorseId,
        profile: &HorseProfile,
    ) -> Result<Option<Horse>, HorseRepositoryError> {
        let mut tables = self.tables.lock().await;
        let now = self.clock.utc();
        let Some(horse) = tables.horses.iter_mut().find(|horse| horse.id == id) else {
            return Ok(None);
        };
        horse.profile = profile.clone();
        horse.updated_at = now;
        let updated = horse.clone();
        Ok(Some(tables.horse_view(&updated)))
    }

    async fn delete(&self, id: HorseId) -> Result<Option<Horse>, HorseRepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables.horses.iter().position(|horse| horse.id == id) else {
            return Ok(None);
        };
        let removed = tables.horse_view(&tables.horses[index]);
        tables.horses.remove(index);

        let now = self.clock.utc();
        for stall in tables
            .stalls
            .iter_mut()
            .filter(|stall| stall.horse_id == Some(id))
        {
            stall.horse_id = None;
            stall.status = StallStatus::Available;
            stall.updated_at = now;
        }
        tables.activities.retain(|activity| activity.entry.horse_id() != id);
        for event in tables
            .events
            .iter_mut()
            .filter(|event| event.details.horse_id() == Some(id))
        {
            let details = &event.details;
            event.details = EventDetails::from_stored(
                details.title().to_owned(),
                details.date(),
                details.hour(),
                details.duration_minutes(),
                details.location().map(str::to_owned),
                None,
            );
        }
        Ok(Some(removed))
    }
}

#[async_trait]
impl StableRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Stable>, StableRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .stables
            .iter()
            .map(|stable| tables.stable_view(stable))
            .collect())
    }

    async fn find(&self, id: StableId) -> Result<Option<Stable>, StableRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .stables
            .iter()
            .find(|stable| stable.id == id)
            .map(|stable| tables.stable_view(stable)))
    }

    async fn create(&self, profile: &StableProfile) -> Result<Stable, StableRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables
            .stables
            .iter()
            .any(|stable| stable.profile.full_name() == profile.full_name())
        {
            return Err(StableRepositoryError::conflict(profile.full_name()));
        }
        let now = self.clock.utc();
        let stable = Stable {
            id: StableId::random(),
            profile: profile.clone(),
            stall_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        tables.stables.push(stable.clone());
        Ok(stable)
    }

    async fn update(
        &self,
        id: StableId,
        profile: &StableProfile,
    ) -> Result<Option<Stable>, StableRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables
            .stables
            .iter()
            .any(|stable| stable.id != id && stable.profile.full_name() == profile.full_name())
        {
            return Err(StableRepositoryError::conflict(profile.full_name()));
        }
        let stall_count = tables
            .stalls
            .iter()
            .filter(|stall| stall.spec.stable_id() == Some(id))
            .count();
        let now = self.clock.utc();
        let Some(stable) = tables.stables.iter_mut().find(|stable| stable.id == id) else {
            return Ok(None);
        };
        check_capacity(profile, stall_count).map_err(StableRepositoryError::rule)?;
        stable.profile = profile.clone();
        stable.updated_at = now;
        let updated = stable.clone();
        Ok(Some(tables.stable_view(&updated)))
    }

    async fn delete(&self, id: StableId) -> Result<Option<Stable>, StableRepositoryError> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables.stables.iter().position(|stable| stable.id == id) else {
            return Ok(None);
        };
        let removed = tables.stable_view(&tables.stables[index]);
        tables.stables.remove(index);
        let now = self.clock.utc();
        for stall in tables
            .stalls
            .iter_mut()
            .filter(|stall| stall.spec.stable_id() == Some(id))
        {
            stall.spec = stall.spec.detached();
            stall.updated_at = now;
        }
        Ok(Some(removed))
    }
}

#[cfg(test)]
#[path = "stalls_tests.rs"]
mod tests;
