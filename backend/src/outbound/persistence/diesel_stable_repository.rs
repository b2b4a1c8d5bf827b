//! PostgreSQL-backed `StableRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{StableRepository, StableRepositoryError};
use crate::domain::{
    Stable, StableDraft, StableId, StableProfile, StableRuleError, StallId, UserId,
    check_capacity,
};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{StableRow, StableWrite};
use super::pool::{DbPool, PoolError};
use super::schema::{stables, stalls};

/// Diesel-backed implementation of the stable repository port.
#[derive(Clone)]
pub struct DieselStableRepository {
    pool: DbPool,
}

impl DieselStableRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug)]
enum TxError {
    Diesel(DieselError),
    Rule(StableRuleError),
}

impl From<DieselError> for TxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<TxError> for StableRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(error) => map_diesel_error(error),
            TxError::Rule(rule) => StableRepositoryError::rule(rule),
        }
    }
}

fn map_pool_error(error: PoolError) -> StableRepositoryError {
    map_basic_pool_error(error, |message| StableRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> StableRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        return StableRepositoryError::conflict(constraint);
    }
    map_basic_diesel_error(
        error,
        StableRepositoryError::query,
        StableRepositoryError::connection,
    )
}

fn write_row(profile: &StableProfile) -> StableWrite<'_> {
    StableWrite {
        full_name: profile.full_name(),
        location: profile.location(),
        capacity: i32::try_from(profile.capacity()).unwrap_or(i32::MAX),
        description: profile.description(),
        stall_size: profile.stall_size(),
        managed_by: profile.managed_by().map(|id| *id.as_uuid()),
    }
}

fn row_to_stable(row: StableRow, stall_ids: Vec<StallId>) -> Result<Stable, StableRepositoryError> {
    let profile = StableProfile::new(StableDraft {
        full_name: row.full_name,
        location: row.location,
        capacity: i64::from(row.capacity),
        description: row.description,
        stall_size: row.stall_size,
        managed_by: row.managed_by.map(UserId::from_uuid),
    })
    .map_err(|err| StableRepositoryError::query(format!("invalid stored stable: {err}")))?;
    Ok(Stable {
        id: StableId::from_uuid(row.id),
        profile,
        stall_ids,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

async fn stall_ids_in<C>(conn: &mut C, stable_id: Uuid) -> Result<Vec<StallId>, DieselError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let ids: Vec<Uuid> = stalls::table
        .filter(stalls::stable_id.eq(stable_id))
        .select(stalls::id)
        .order_by(stalls::number)
        .load(conn)
        .await?;
    Ok(ids.into_iter().map(StallId::from_uuid).collect())
}

async fn load_stable<C>(conn: &mut C, id: Uuid) -> Result<Option<StableRow>, DieselError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    stables::table
        .find(id)
        .select(StableRow::as_select())
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl StableRepository for DieselStableRepository {
    async fn list(&self) -> Result<Vec<Stable>, StableRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<StableRow> = stables::table
            .select(StableRow::as_select())
            .order_by(stables::full_name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let pairs: Vec<(Uuid, Option<Uuid>)> = stalls::table
            .filter(stalls::stable_id.is_not_null())
            .select((stalls::id, stalls::stable_id))
            .order_by(stalls::number)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let mut by_stable: HashMap<Uuid, Vec<StallId>> = HashMap::new();
        for (stall_id, stable_id) in pairs {
            if let Some(stable_id) = stable_id {
                by_stable
                    .entry(stable_id)
                    .or_default()
                    .push(StallId::from_uuid(stall_id));
            }
        }
        rows.into_iter()
            .map(|row| {
                let stall_ids = by_stable.remove(&row.id).unwrap_or_default();
                row_to_stable(row, stall_ids)
            })
            .collect()
    }

    async fn find(&self, id: StableId) -> Result<Option<Stable>, StableRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = load_stable(&mut conn, *id.as_uuid())
            .await
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let stall_ids = stall_ids_in(&mut conn, row.id)
            .await
            .map_err(map_diesel_error)?;
        row_to_stable(row, stall_ids).map(Some)
    }

    async fn create(&self, profile: &StableProfile) -> Result<Stable, StableRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: StableRow = diesel::insert_into(stables::table)
            .values(&write_row(profile))
            .returning(StableRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_stable(row, Vec::new())
    }

    async fn update(
        &self,
        id: StableId,
        profile: &StableProfile,
    ) -> Result<Option<Stable>, StableRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stable_uuid = *id.as_uuid();
        let updated = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let locked: Option<Uuid> = stables::table
                        .find(stable_uuid)
                        .select(stables::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }
                    let stall_ids = stall_ids_in(conn, stable_uuid).await?;
                    check_capacity(profile, stall_ids.len()).map_err(TxError::Rule)?;
                    let row: StableRow = diesel::update(stables::table.find(stable_uuid))
                        .set((&write_row(profile), stables::updated_at.eq(Utc::now())))
                        .returning(StableRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(Some((row, stall_ids)))
                }
                .scope_boxed()
            })
            .await?;
        updated
            .map(|(row, stall_ids)| row_to_stable(row, stall_ids))
            .transpose()
    }

    async fn delete(&self, id: StableId) -> Result<Option<Stable>, StableRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stable_uuid = *id.as_uuid();
        let removed = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let Some(row) = load_stable(conn, stable_uuid).await? else {
                        return Ok(None);
                    };
                    let stall_ids = stall_ids_in(conn, stable_uuid).await?;
                    diesel::update(stalls::table.filter(stalls::stable_id.eq(stable_uuid)))
                        .set((
                            stalls::stable_id.eq(None::<Uuid>),
                            stalls::updated_at.eq(Utc::now()),
                        ))
                        .execute(conn)
                        .await?;
                    diesel::delete(stables::table.find(stable_uuid))
                        .execute(conn)
                        .await?;
                    Ok(Some((row, stall_ids)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        removed
            .map(|(row, stall_ids)| row_to_stable(row, stall_ids))
            .transpose()
    }
}
