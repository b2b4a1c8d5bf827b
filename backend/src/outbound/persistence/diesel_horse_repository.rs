//! PostgreSQL-backed `HorseRepository` implementation using Diesel ORM.
//!
//! Placement is read through a left join on `stalls.horse_id`; the horse
//! row itself stores no stall reference.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{HorseRepository, HorseRepositoryError};
use crate::domain::{
    Horse, HorseDraft, HorseFilter, HorseId, HorseProfile, StableId, StallId, StallPlacement,
    StallStatus,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{HorseRow, HorseWrite, StallRow};
use super::pool::{DbPool, PoolError};
use super::schema::{horses, stalls};

/// Diesel-backed implementation of the horse repository port.
#[derive(Clone)]
pub struct DieselHorseRepository {
    pool: DbPool,
}

impl DieselHorseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) type HeldStallLock = dsl::ForUpdate<
    dsl::Filter<dsl::Select<stalls::table, stalls::id>, dsl::Eq<stalls::horse_id, Uuid>>,
>;

/// Row locks on the stall holding `horse_uuid`.
///
/// Stall rows are always locked before the horse row they reference.
pub(super) fn lock_held_stall(horse_uuid: Uuid) -> HeldStallLock {
    stalls::table
        .select(stalls::id)
        .filter(stalls::horse_id.eq(horse_uuid))
        .for_update()
}

fn map_pool_error(error: PoolError) -> HorseRepositoryError {
    map_basic_pool_error(error, |message| HorseRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> HorseRepositoryError {
    map_basic_diesel_error(
        error,
        HorseRepositoryError::query,
        HorseRepositoryError::connection,
    )
}

fn write_row(profile: &HorseProfile) -> HorseWrite<'_> {
    HorseWrite {
        name: profile.name(),
        age: profile.age().map(i16::from),
        breed: profile.breed(),
        owner: profile.owner(),
        owner_email: profile.owner_email().as_ref(),
        birth_date: profile.birth_date(),
        notes: profile.notes(),
    }
}

fn placement(row: StallRow) -> StallPlacement {
    StallPlacement {
        stall_id: StallId::from_uuid(row.id),
        number: row.number,
        name: row.name,
        size: row.size,
        stable_id: row.stable_id.map(StableId::from_uuid),
    }
}

/// Convert a joined row into a validated domain horse.
fn row_to_horse(
    (row, stall): (HorseRow, Option<StallRow>),
) -> Result<Horse, HorseRepositoryError> {
    let profile = HorseProfile::new(HorseDraft {
        name: row.name,
        age: row.age.map(i64::from),
        breed: row.breed,
        owner: row.owner,
        owner_email: row.owner_email,
        birth_date: row.birth_date,
        notes: row.notes,
    })
    .map_err(|err| HorseRepositoryError::query(format!("invalid stored horse: {err}")))?;
    Ok(Horse {
        id: HorseId::from_uuid(row.id),
        profile,
        placement: stall.map(placement),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Load one horse with its placement on an existing connection.
macro_rules! load_horse {
    ($conn:expr, $id:expr) => {{
        let row: Option<(HorseRow, Option<StallRow>)> = horses::table
            .left_join(stalls::table)
            .filter(horses::id.eq($id))
            .select((HorseRow::as_select(), Option::<StallRow>::as_select()))
            .first($conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_horse).transpose()
    }};
}

#[async_trait]
impl HorseRepository for DieselHorseRepository {
    async fn list(&self, filter: &HorseFilter) -> Result<Vec<Horse>, HorseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = horses::table
            .left_join(stalls::table)
            .select((HorseRow::as_select(), Option::<StallRow>::as_select()))
            .order_by(horses::created_at)
            .into_boxed();
        if let Some(email) = &filter.owner_email {
            query = query.filter(horses::owner_email.eq(email.to_string()));
        }
        let rows: Vec<(HorseRow, Option<StallRow>)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_horse).collect()
    }

    async fn find(&self, id: HorseId) -> Result<Option<Horse>, HorseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_horse!(&mut conn, *id.as_uuid())
    }

    async fn create(&self, profile: &HorseProfile) -> Result<Horse, HorseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: HorseRow = diesel::insert_into(horses::table)
            .values(&write_row(profile))
            .returning(HorseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_horse((row, None))
    }

    async fn update(
        &self,
        id: HorseId,
        profile: &HorseProfile,
    ) -> Result<Option<Horse>, HorseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(horses::table.find(*id.as_uuid()))
            .set((&write_row(profile), horses::updated_at.eq(Utc::now())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Ok(None);
        }
        load_horse!(&mut conn, *id.as_uuid())
    }

    async fn delete(&self, id: HorseId) -> Result<Option<Horse>, HorseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let horse_uuid: Uuid = *id.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                lock_held_stall(horse_uuid).load::<Uuid>(conn).await?;
                let locked: Option<Uuid> = horses::table
                    .find(horse_uuid)
                    .select(horses::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Ok(None);
                }
                let row: (HorseRow, Option<StallRow>) = horses::table
                    .left_join(stalls::table)
                    .filter(horses::id.eq(horse_uuid))
                    .select((HorseRow::as_select(), Option::<StallRow>::as_select()))
                    .first(conn)
                    .await?;
                diesel::update(stalls::table.filter(stalls::horse_id.eq(horse_uuid)))
                    .set((
                        stalls::horse_id.eq(None::<Uuid>),
                        stalls::status.eq(StallStatus::Available.as_str()),
                        stalls::updated_at.eq(Utc::now()),
                    ))
                    .execute(conn)
                    .await?;
                diesel::delete(horses::table.find(horse_uuid))
                    .execute(conn)
                    .await?;
                Ok(Some(row))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?
        .map(row_to_horse)
        .transpose()
    }
}
