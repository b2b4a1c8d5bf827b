//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{Event, EventDetails, EventId, EventRange, HorseId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EventRow, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::events;

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, |message| EventRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn new_row(details: &EventDetails) -> NewEventRow<'_> {
    NewEventRow {
        title: details.title(),
        date: details.date(),
        hour: details.hour(),
        duration_minutes: details
            .duration_minutes()
            .map(|minutes| i32::try_from(minutes).unwrap_or(i32::MAX)),
        location: details.location(),
        horse_id: details.horse_id().map(|id| *id.as_uuid()),
    }
}

fn row_to_event(row: EventRow) -> Result<Event, EventRepositoryError> {
    let duration_minutes = row
        .duration_minutes
        .map(u32::try_from)
        .transpose()
        .map_err(|_| EventRepositoryError::query("invalid stored event: negative duration"))?;
    Ok(Event {
        id: EventId::from_uuid(row.id),
        details: EventDetails::from_stored(
            row.title,
            row.date,
            row.hour,
            duration_minutes,
            row.location,
            row.horse_id.map(HorseId::from_uuid),
        ),
        created_at: row.created_at,
    })
}

fn rows_to_events(rows: Vec<EventRow>) -> Result<Vec<Event>, EventRepositoryError> {
    rows.into_iter().map(row_to_event).collect()
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn list_on(&self, date: NaiveDate) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = events::table
            .filter(events::date.eq(date))
            .select(EventRow::as_select())
            .order_by((events::hour.asc().nulls_first(), events::created_at.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_events(rows)
    }

    async fn list_between(&self, range: EventRange) -> Result<Vec<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EventRow> = events::table
            .filter(events::date.between(range.start(), range.end()))
            .select(EventRow::as_select())
            .order_by((
                events::date.asc(),
                events::hour.asc().nulls_first(),
                events::created_at.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_events(rows)
    }

    async fn find(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<EventRow> = events::table
            .find(*id.as_uuid())
            .select(EventRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_event).transpose()
    }

    async fn create(&self, details: &EventDetails) -> Result<Event, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: EventRow = diesel::insert_into(events::table)
            .values(&new_row(details))
            .returning(EventRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_event(row)
    }

    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(events::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
