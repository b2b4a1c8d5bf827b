//! Staff, finances, the schedule and the horse activity log.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    EventRepository, EventRepositoryError, ExpenseRepository, ExpenseRepositoryError,
    HorseActivityRepository, HorseActivityRepositoryError, StaffRepository,
    StaffRepositoryError,
};
use crate::domain::{
    ActivityEntry, Event, EventDetails, EventId, EventRange, Expense, ExpenseEntry,
    ExpenseFilter, ExpenseId, HorseActivity, HorseActivityId, HorseId, Staff, StaffId,
    StaffProfile,
};

use super::MemoryStore;

#[async_trait]
impl StaffRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Staff>, StaffRepositoryError> {
        Ok(self.tables.lock().await.staff.clone())
    }

    async fn find(&self, id: StaffId) -> Result<Option<Staff>, StaffRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.staff.iter().find(|member| member.id == id).cloned())
    }

    async fn create(&self, profile: &StaffProfile) -> Result<Staff, StaffRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables
            .staff
            .iter()
            .any(|member| member.profile.email() == profile.email())
        {
            return Err(StaffRepositoryError::conflict(profile.email().as_ref()));
        }
        let now = self.clock.utc();
        let member = Staff {
            id: StaffId::random(),
            profile: profile.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.staff.push(member.clone());
        Ok(member)
    }

    async fn update(
        &self,
        id: StaffId,
        profile: &StaffProfile,
    ) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables
            .staff
            .iter()
            .any(|member| member.id != id && member.profile.email() == profile.email())
        {
            return Err(StaffRepositoryError::conflict(profile.email().as_ref()));
        }
        let now = self.clock.utc();
        Ok(tables
            .staff
            .iter_mut()
            .find(|member| member.id == id)
            .map(|member| {
                member.profile = profile.clone();
                member.updated_at = now;
                member.clone()
            }))
    }

    async fn delete(&self, id: StaffId) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut tables = self.tables.lock().await;
        let index = tables.staff.iter().position(|member| member.id == id);
        Ok(index.map(|index| tables.staff.remove(index)))
    }
}

#[async_trait]
impl ExpenseRepository for MemoryStore {
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, ExpenseRepositoryError> {
        let tables = self.tables.lock().await;
        let mut expenses: Vec<Expense> = tables
            .expenses
            .iter()
            .filter(|expense| filter.matches(expense))
            .cloned()
            .collect();
        expenses.sort_by_key(|expense| Reverse((expense.entry.date(), expense.created_at)));
        Ok(expenses)
    }

    async fn find(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.expenses.iter().find(|expense| expense.id == id).cloned())
    }

    async fn create(&self, entry: &ExpenseEntry) -> Result<Expense, ExpenseRepositoryError> {
        let mut tables = self.tables.lock().await;
        let now = self.clock.utc();
        let expense = Expense {
            id: ExpenseId::random(),
            entry: entry.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.expenses.push(expense.clone());
        Ok(expense)
    }

    async fn update(
        &self,
        id: ExpenseId,
        entry: &ExpenseEntry,
    ) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut tables = self.tables.lock().await;
        let now = self.clock.utc();
        Ok(tables
            .expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .map(|expense| {
                expense.entry = entry.clone();
                expense.updated_at = now;
                expense.clone()
            }))
    }

    async fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseRepositoryError> {
        let mut tables = self.tables.lock().await;
        let index = tables.expenses.iter().position(|expense| expense.id == id);
        Ok(index.map(|index| tables.expenses.remove(index)))
    }
}

fn sorted_events<'a>(events: impl Iterator<Item = &'a Event>) -> Vec<Event> {
    let mut events: Vec<Event> = events.cloned().collect();
    events.sort_by_key(|event| (event.details.date(), event.details.hour(), event.created_at));
    events
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn list_on(&self, date: NaiveDate) -> Result<Vec<Event>, EventRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(sorted_events(
            tables
                .events
                .iter()
                .filter(|event| event.details.date() == date),
        ))
    }

    async fn list_between(&self, range: EventRange) -> Result<Vec<Event>, EventRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(sorted_events(
            tables
                .events
                .iter()
                .filter(|event| range.contains(event.details.date())),
        ))
    }

    async fn find(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.events.iter().find(|event| event.id == id).cloned())
    }

    async fn create(&self, details: &EventDetails) -> Result<Event, EventRepositoryError> {
        let mut tables = self.tables.lock().await;
        let event = Event {
            id: EventId::random(),
            details: details.clone(),
            created_at: self.clock.utc(),
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError> {
        let mut tables = self.tables.lock().await;
        let before = tables.events.len();
        tables.events.retain(|event| event.id != id);
        Ok(tables.events.len() != before)
    }
}

#[async_trait]
impl HorseActivityRepository for MemoryStore {
    async fn list(
        &self,
        horse_id: Option<HorseId>,
    ) -> Result<Vec<HorseActivity>, HorseActivityRepositoryError> {
        let tables = self.tables.lock().await;
        let mut activities: Vec<HorseActivity> = tables
            .activities
            .iter()
            .filter(|activity| horse_id.is_none_or(|id| activity.entry.horse_id() == id))
            .cloned()
            .collect();
        activities.sort_by_key(|activity| Reverse((activity.entry.date(), activity.created_at)));
        Ok(activities)
    }

    async fn find(
        &self,
        id: HorseActivityId,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .activities
            .iter()
            .find(|activity| activity.id == id)
            .cloned())
    }

    async fn create(
        &self,
        entry: &ActivityEntry,
    ) -> Result<HorseActivity, HorseActivityRepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.horses.iter().any(|horse| horse.id == entry.horse_id()) {
            return Err(HorseActivityRepositoryError::missing_horse());
        }
        let now = self.clock.utc();
        let activity = HorseActivity {
            id: HorseActivityId::random(),
            entry: entry.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.activities.push(activity.clone());
        Ok(activity)
    }

    async fn update(
        &self,
        id: HorseActivityId,
        entry: &ActivityEntry,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.horses.iter().any(|horse| horse.id == entry.horse_id()) {
            return Err(HorseActivityRepositoryError::missing_horse());
        }
        let now = self.clock.utc();
        Ok(tables
            .activities
            .iter_mut()
            .find(|activity| activity.id == id)
            .map(|activity| {
                activity.entry = entry.clone();
                activity.updated_at = now;
                activity.clone()
            }))
    }

    async fn delete(
        &self,
        id: HorseActivityId,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError> {
        let mut tables = self.tables.lock().await;
        let index = tables.activities.iter().position(|activity| activity.id == id);
        Ok(index.map(|index| tables.activities.remove(index)))
    }
}
