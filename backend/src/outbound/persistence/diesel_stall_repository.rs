//! PostgreSQL-backed `StallRepository` implementation using Diesel ORM.
//!
//! Mutations run in one transaction with the stall row locked `FOR UPDATE`;
//! moves into a stable also lock the stable row so concurrent creations
//! cannot overfill it. Concurrent assignments of one stall serialise on the
//! lock and the loser observes the winner's horse. Stall rows are locked
//! before the horse row they reference.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{StallRepository, StallRepositoryError};
use crate::domain::{
    Assignment, HorseId, StableId, Stall, StallFilter, StallId, StallRuleError, StallSpec,
    StallStatus, check_assignment, check_removable, check_stable_room, resolve_status,
};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::diesel_horse_repository::lock_held_stall;
use super::models::{NewStallRow, StallRow, StallSpecUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{horses, stables, stalls};

/// Diesel-backed implementation of the stall repository port.
#[derive(Clone)]
pub struct DieselStallRepository {
    pool: DbPool,
}

impl DieselStallRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a stall transaction.
#[derive(Debug)]
enum TxError {
    Diesel(DieselError),
    Stall(StallRepositoryError),
}

impl From<DieselError> for TxError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl From<StallRepositoryError> for TxError {
    fn from(error: StallRepositoryError) -> Self {
        Self::Stall(error)
    }
}

impl From<StallRuleError> for TxError {
    fn from(rule: StallRuleError) -> Self {
        Self::Stall(StallRepositoryError::rule(rule))
    }
}

impl From<TxError> for StallRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(error) => map_diesel_error(error),
            TxError::Stall(error) => error,
        }
    }
}

fn map_pool_error(error: PoolError) -> StallRepositoryError {
    map_basic_pool_error(error, |message| StallRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> StallRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        debug!(constraint, "stall unique constraint violated");
        return StallRepositoryError::conflict(constraint);
    }
    if is_foreign_key_violation(&error) {
        if let DieselError::DatabaseError(_, info) = &error {
            if info.constraint_name().is_some_and(|name| name.contains("horse")) {
                return StallRepositoryError::missing_horse();
            }
        }
        return StallRepositoryError::missing_stable();
    }
    map_basic_diesel_error(
        error,
        StallRepositoryError::query,
        StallRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain stall.
pub(super) fn row_to_stall(row: StallRow) -> Result<Stall, StallRepositoryError> {
    let spec = StallSpec::new(
        &row.number,
        row.name,
        &row.size,
        row.stable_id.map(StableId::from_uuid),
    )
    .map_err(|err| StallRepositoryError::query(format!("invalid stored stall: {err}")))?;
    let status = StallStatus::from_str(&row.status)
        .map_err(|err| StallRepositoryError::query(format!("invalid stored stall: {err}")))?;
    Ok(Stall {
        id: StallId::from_uuid(row.id),
        spec,
        status,
        horse_id: row.horse_id.map(HorseId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

async fn lock_stall<C>(conn: &mut C, id: Uuid) -> Result<Stall, TxError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let row: Option<StallRow> = stalls::table
        .find(id)
        .select(StallRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let row = row.ok_or_else(StallRepositoryError::missing_stall)?;
    Ok(row_to_stall(row)?)
}

/// Lock the stable and check it can take one more stall.
async fn reserve_room<C>(conn: &mut C, stable_id: StableId) -> Result<(), TxError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let stable_uuid = *stable_id.as_uuid();
    let capacity: Option<i32> = stables::table
        .find(stable_uuid)
        .select(stables::capacity)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let capacity = capacity.ok_or_else(StallRepositoryError::missing_stable)?;
    let count: i64 = stalls::table
        .filter(stalls::stable_id.eq(stable_uuid))
        .count()
        .get_result(conn)
        .await?;
    check_stable_room(
        u32::try_from(capacity).unwrap_or_default(),
        usize::try_from(count).unwrap_or(usize::MAX),
    )?;
    Ok(())
}

async fn set_occupant<C>(
    conn: &mut C,
    id: Uuid,
    horse_id: Option<Uuid>,
) -> Result<Stall, TxError>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let status = if horse_id.is_some() {
        StallStatus::Occupied
    } else {
        StallStatus::Available
    };
    let row: StallRow = diesel::update(stalls::table.find(id))
        .set((
            stalls::horse_id.eq(horse_id),
            stalls::status.eq(status.as_str()),
            stalls::updated_at.eq(Utc::now()),
        ))
        .returning(StallRow::as_returning())
        .get_result(conn)
        .await?;
    Ok(row_to_stall(row)?)
}

#[async_trait]
impl StallRepository for DieselStallRepository {
    async fn list(&self, filter: &StallFilter) -> Result<Vec<Stall>, StallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = stalls::table
            .select(StallRow::as_select())
            .order_by((stalls::stable_id, stalls::number))
            .into_boxed();
        if let Some(stable_id) = filter.stable_id {
            query = query.filter(stalls::stable_id.eq(*stable_id.as_uuid()));
        }
        if let Some(status) = filter.status {
            query = query.filter(stalls::status.eq(status.as_str()));
        }
        let rows: Vec<StallRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_stall).collect()
    }

    async fn find(&self, id: StallId) -> Result<Option<Stall>, StallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StallRow> = stalls::table
            .find(*id.as_uuid())
            .select(StallRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_stall).transpose()
    }

    async fn create(
        &self,
        spec: &StallSpec,
        status: StallStatus,
    ) -> Result<Stall, StallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stall = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    if let Some(stable_id) = spec.stable_id() {
                        reserve_room(conn, stable_id).await?;
                    }
                    let row: StallRow = diesel::insert_into(stalls::table)
                        .values(&NewStallRow {
                            number: spec.number(),
                            name: spec.name(),
                            size: spec.size(),
                            stable_id: spec.stable_id().map(|id| *id.as_uuid()),
                            status: status.as_str(),
                        })
                        .returning(StallRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(row_to_stall(row)?)
                }
                .scope_boxed()
            })
            .await?;
        Ok(stall)
    }

    async fn update(
        &self,
        id: StallId,
        spec: &StallSpec,
        requested_status: Option<StallStatus>,
    ) -> Result<Stall, StallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stall_uuid = *id.as_uuid();
        let stall = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let current = lock_stall(conn, stall_uuid).await?;
                    let status = resolve_status(&current, requested_status)?;
                    if let Some(target) = spec.stable_id() {
                        if current.spec.stable_id() != Some(target) {
                            reserve_room(conn, target).await?;
                        }
                    }
                    let row: StallRow = diesel::update(stalls::table.find(stall_uuid))
                        .set(&StallSpecUpdate {
                            number: spec.number(),
                            name: spec.name(),
                            size: spec.size(),
                            stable_id: spec.stable_id().map(|id| *id.as_uuid()),
                            status: status.as_str(),
                            updated_at: Utc::now(),
                        })
                        .returning(StallRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(row_to_stall(row)?)
                }
                .scope_boxed()
            })
            .await?;
        Ok(stall)
    }

    async fn delete(&self, id: StallId) -> Result<Stall, StallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stall_uuid = *id.as_uuid();
        let stall = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let current = lock_stall(conn, stall_uuid).await?;
                    check_removable(&current)?;
                    diesel::delete(stalls::table.find(stall_uuid))
                        .execute(conn)
                        .await?;
                    Ok(current)
                }
                .scope_boxed()
            })
            .await?;
        Ok(stall)
    }

    async fn assign(&self, id: StallId, horse_id: HorseId) -> Result<Stall, StallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stall_uuid = *id.as_uuid();
        let horse_uuid = *horse_id.as_uuid();
        let stall = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let current = lock_stall(conn, stall_uuid).await?;
                    lock_held_stall(horse_uuid).load::<Uuid>(conn).await?;
                    let horse: Option<Uuid> = horses::table
                        .find(horse_uuid)
                        .select(horses::id)
                        .for_key_share()
                        .first(conn)
                        .await
                        .optional()?;
                    if horse.is_none() {
                        return Err(StallRepositoryError::missing_horse().into());
                    }
                    if check_assignment(&current, horse_id)? == Assignment::AlreadyAssigned {
                        return Ok(current);
                    }
                    diesel::update(stalls::table.filter(stalls::horse_id.eq(horse_uuid)))
                        .set((
                            stalls::horse_id.eq(None::<Uuid>),
                            stalls::status.eq(StallStatus::Available.as_str()),
                            stalls::updated_at.eq(Utc::now()),
                        ))
                        .execute(conn)
                        .await?;
                    set_occupant(conn, stall_uuid, Some(horse_uuid)).await
                }
                .scope_boxed()
            })
            .await?;
        Ok(stall)
    }

    async fn release(&self, id: StallId) -> Result<Stall, StallRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stall_uuid = *id.as_uuid();
        let stall = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let current = lock_stall(conn, stall_uuid).await?;
                    if current.horse_id.is_none() {
                        return Ok(current);
                    }
                    set_occupant(conn, stall_uuid, None).await
                }
                .scope_boxed()
            })
            .await?;
        Ok(stall)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn row(status: &str, horse_id: Option<Uuid>) -> StallRow {
        let now = Utc::now();
        StallRow {
            id: Uuid::new_v4(),
            number: "12".into(),
            name: Some("Corner".into()),
            size: "large".into(),
            stable_id: None,
            status: status.into(),
            horse_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn converts_occupied_row() {
        let horse = Uuid::new_v4();
        let stall = row_to_stall(row("occupied", Some(horse))).expect("valid row");
        assert_eq!(stall.status, StallStatus::Occupied);
        assert_eq!(stall.horse_id, Some(HorseId::from_uuid(horse)));
    }

    #[rstest]
    fn unknown_status_is_query_error() {
        let err = row_to_stall(row("flooded", None)).expect_err("corrupt row");
        assert!(matches!(err, StallRepositoryError::Query { .. }));
    }

    #[rstest]
    fn rule_failures_pass_through_transactions() {
        let mapped: StallRepositoryError = TxError::from(StallRuleError::UnderMaintenance).into();
        assert_eq!(
            mapped,
            StallRepositoryError::rule(StallRuleError::UnderMaintenance)
        );
    }
}
