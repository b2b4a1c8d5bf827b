//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion to domain types lives beside each
//! repository.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    events, expenses, horse_activities, horses, stables, staff, stalls, users,
};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub role: &'a str,
    pub password_hash: Option<&'a str>,
    pub google_id: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Horses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = horses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HorseRow {
    pub id: Uuid,
    pub name: String,
    pub age: Option<i16>,
    pub breed: Option<String>,
    pub owner: Option<String>,
    pub owner_email: String,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-replacement changeset for horses.
///
/// `treat_none_as_null` so clearing an optional field persists.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = horses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct HorseWrite<'a> {
    pub name: &'a str,
    pub age: Option<i16>,
    pub breed: Option<&'a str>,
    pub owner: Option<&'a str>,
    pub owner_email: &'a str,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Stalls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stalls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StallRow {
    pub id: Uuid,
    pub number: String,
    pub name: Option<String>,
    pub size: String,
    pub stable_id: Option<Uuid>,
    pub status: String,
    pub horse_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stalls)]
pub(crate) struct NewStallRow<'a> {
    pub number: &'a str,
    pub name: Option<&'a str>,
    pub size: &'a str,
    pub stable_id: Option<Uuid>,
    pub status: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = stalls)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct StallSpecUpdate<'a> {
    pub number: &'a str,
    pub name: Option<&'a str>,
    pub size: &'a str,
    pub stable_id: Option<Uuid>,
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Stables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stables)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StableRow {
    pub id: Uuid,
    pub full_name: String,
    pub location: Option<String>,
    pub capacity: i32,
    pub description: Option<String>,
    pub stall_size: Option<String>,
    pub managed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = stables)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct StableWrite<'a> {
    pub full_name: &'a str,
    pub location: Option<&'a str>,
    pub capacity: i32,
    pub description: Option<&'a str>,
    pub stall_size: Option<&'a str>,
    pub managed_by: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = staff)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StaffRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub specialities: Vec<String>,
    pub schedule: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = staff)]
pub(crate) struct StaffWrite<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub specialities: &'a [String],
    pub schedule: &'a [String],
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: Uuid,
    pub date: NaiveDate,
    pub kind: String,
    pub category: String,
    pub related_model: Option<String>,
    pub related_id: Option<Uuid>,
    pub amount_cents: i64,
    pub settled: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = expenses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ExpenseWrite<'a> {
    pub date: NaiveDate,
    pub kind: &'a str,
    pub category: &'a str,
    pub related_model: Option<&'a str>,
    pub related_id: Option<Uuid>,
    pub amount_cents: i64,
    pub settled: bool,
    pub description: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub hour: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub horse_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub title: &'a str,
    pub date: NaiveDate,
    pub hour: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub location: Option<&'a str>,
    pub horse_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Horse activities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = horse_activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HorseActivityRow {
    pub id: Uuid,
    pub horse_id: Uuid,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub all_day: bool,
    pub kind: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = horse_activities)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct HorseActivityWrite<'a> {
    pub horse_id: Uuid,
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub all_day: bool,
    pub kind: Option<&'a str>,
    pub notes: Option<&'a str>,
}
