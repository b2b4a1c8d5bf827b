//! PostgreSQL-backed `HorseActivityRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HorseActivityRepository, HorseActivityRepositoryError};
use crate::domain::{ActivityDraft, ActivityEntry, HorseActivity, HorseActivityId, HorseId};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{HorseActivityRow, HorseActivityWrite};
use super::pool::{DbPool, PoolError};
use super::schema::horse_activities;

/// Diesel-backed implementation of the horse activity repository port.
#[derive(Clone)]
pub struct DieselHorseActivityRepository {
    pool: DbPool,
}

impl DieselHorseActivityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HorseActivityRepositoryError {
    map_basic_pool_error(error, |message| {
        HorseActivityRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: DieselError) -> HorseActivityRepositoryError {
    if is_foreign_key_violation(&error) {
        return HorseActivityRepositoryError::missing_horse();
    }
    map_basic_diesel_error(
        error,
        HorseActivityRepositoryError::query,
        HorseActivityRepositoryError::connection,
    )
}

fn write_row(entry: &ActivityEntry) -> HorseActivityWrite<'_> {
    HorseActivityWrite {
        horse_id: *entry.horse_id().as_uuid(),
        date: entry.date(),
        duration_minutes: entry
            .duration_minutes()
            .map(|minutes| i32::try_from(minutes).unwrap_or(i32::MAX)),
        all_day: entry.all_day(),
        kind: entry.kind(),
        notes: entry.notes(),
    }
}

fn row_to_activity(row: HorseActivityRow) -> Result<HorseActivity, HorseActivityRepositoryError> {
    let entry = ActivityEntry::new(
        HorseId::from_uuid(row.horse_id),
        ActivityDraft {
            date: row.date,
            duration_minutes: row.duration_minutes.map(i64::from),
            all_day: row.all_day,
            kind: row.kind,
            notes: row.notes,
        },
    )
    .map_err(|err| {
        HorseActivityRepositoryError::query(format!("invalid stored activity: {err}"))
    })?;
    Ok(HorseActivity {
        id: HorseActivityId::from_uuid(row.id),
        entry,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl HorseActivityRepository for DieselHorseActivityRepository {
    async fn list(
        &self,
        horse_id: Option<HorseId>,
    ) -> Result<Vec<HorseActivity>, HorseActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = horse_activities::table
            .select(HorseActivityRow::as_select())
            .order_by((
                horse_activities::date.desc().nulls_last(),
                horse_activities::created_at.desc(),
            ))
            .into_boxed();
        if let Some(horse_id) = horse_id {
            query = query.filter(horse_activities::horse_id.eq(*horse_id.as_uuid()));
        }
        let rows: Vec<HorseActivityRow> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_activity).collect()
    }

    async fn find(
        &self,
        id: HorseActivityId,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HorseActivityRow> = horse_activities::table
            .find(*id.as_uuid())
            .select(HorseActivityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_activity).transpose()
    }

    async fn create(
        &self,
        entry: &ActivityEntry,
    ) -> Result<HorseActivity, HorseActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: HorseActivityRow = diesel::insert_into(horse_activities::table)
            .values(&write_row(entry))
            .returning(HorseActivityRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_activity(row)
    }

    async fn update(
        &self,
        id: HorseActivityId,
        entry: &ActivityEntry,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HorseActivityRow> =
            diesel::update(horse_activities::table.find(*id.as_uuid()))
                .set((
                    &write_row(entry),
                    horse_activities::updated_at.eq(Utc::now()),
                ))
                .returning(HorseActivityRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(row_to_activity).transpose()
    }

    async fn delete(
        &self,
        id: HorseActivityId,
    ) -> Result<Option<HorseActivity>, HorseActivityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HorseActivityRow> =
            diesel::delete(horse_activities::table.find(*id.as_uuid()))
                .returning(HorseActivityRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(row_to_activity).transpose()
    }
}
