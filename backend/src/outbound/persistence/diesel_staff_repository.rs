//! PostgreSQL-backed `StaffRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StaffRepository, StaffRepositoryError};
use crate::domain::{Staff, StaffDraft, StaffId, StaffProfile};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{StaffRow, StaffWrite};
use super::pool::{DbPool, PoolError};
use super::schema::staff;

/// Diesel-backed implementation of the staff repository port.
#[derive(Clone)]
pub struct DieselStaffRepository {
    pool: DbPool,
}

impl DieselStaffRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StaffRepositoryError {
    map_basic_pool_error(error, |message| StaffRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> StaffRepositoryError {
    if let Some(constraint) = unique_violation(&error) {
        return StaffRepositoryError::conflict(constraint);
    }
    map_basic_diesel_error(
        error,
        StaffRepositoryError::query,
        StaffRepositoryError::connection,
    )
}

fn write_row(profile: &StaffProfile) -> StaffWrite<'_> {
    StaffWrite {
        name: profile.name(),
        phone: profile.phone().as_ref(),
        email: profile.email().as_ref(),
        role: profile.role(),
        specialities: profile.specialities(),
        schedule: profile.schedule(),
    }
}

fn row_to_staff(row: StaffRow) -> Result<Staff, StaffRepositoryError> {
    let profile = StaffProfile::new(StaffDraft {
        name: row.name,
        phone: row.phone,
        email: row.email,
        role: row.role,
        specialities: row.specialities,
        schedule: row.schedule,
    })
    .map_err(|err| StaffRepositoryError::query(format!("invalid stored staff member: {err}")))?;
    Ok(Staff {
        id: StaffId::from_uuid(row.id),
        profile,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_staff(rows: Vec<StaffRow>) -> Result<Vec<Staff>, StaffRepositoryError> {
    rows.into_iter().map(row_to_staff).collect()
}

#[async_trait]
impl StaffRepository for DieselStaffRepository {
    async fn list(&self) -> Result<Vec<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<StaffRow> = staff::table
            .select(StaffRow::as_select())
            .order_by(staff::name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_staff(rows)
    }

    async fn find(&self, id: StaffId) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StaffRow> = staff::table
            .find(*id.as_uuid())
            .select(StaffRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_staff).transpose()
    }

    async fn create(&self, profile: &StaffProfile) -> Result<Staff, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: StaffRow = diesel::insert_into(staff::table)
            .values(&write_row(profile))
            .returning(StaffRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_staff(row)
    }

    async fn update(
        &self,
        id: StaffId,
        profile: &StaffProfile,
    ) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StaffRow> = diesel::update(staff::table.find(*id.as_uuid()))
            .set((&write_row(profile), staff::updated_at.eq(Utc::now())))
            .returning(StaffRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_staff).transpose()
    }

    async fn delete(&self, id: StaffId) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StaffRow> = diesel::delete(staff::table.find(*id.as_uuid()))
            .returning(StaffRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_staff).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(phone: &str) -> StaffRow {
        let now = Utc::now();
        StaffRow {
            id: Uuid::new_v4(),
            name: "Anna Kowalska".into(),
            phone: phone.into(),
            email: "anna@example.com".into(),
            role: "groom".into(),
            specialities: vec!["feeding".into()],
            schedule: vec!["Mon 6-14".into()],
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn stored_staff_keeps_lists() {
        let staff = row_to_staff(row("+48600100200")).expect("valid row");
        assert_eq!(staff.profile.specialities(), ["feeding".to_owned()]);
        assert_eq!(write_row(&staff.profile).phone, "+48600100200");
    }

    #[rstest]
    fn corrupt_phone_is_a_query_error() {
        let err = row_to_staff(row("call me")).expect_err("invalid phone");
        assert!(matches!(err, StaffRepositoryError::Query { .. }));
    }
}
