//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, Role, User, UserId, Username};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Fetch at most one user matching `$filter`.
macro_rules! find_user {
    ($self:ident, $filter:expr) => {{
        let mut conn = $self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter($filter)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }};
}

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    if let Some(constraint) = unique_violation(&error) {
        return UserPersistenceError::conflict(constraint);
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = Email::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("invalid stored email: {err}")))?;
    let username = Username::new(&row.username)
        .map_err(|err| UserPersistenceError::query(format!("invalid stored username: {err}")))?;
    let role = Role::from_str(&row.role)
        .map_err(|err| UserPersistenceError::query(format!("invalid stored role: {err}")))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        username,
        role,
        password_hash: row.password_hash,
        google_id: row.google_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                email: user.email.as_ref(),
                username: user.username.as_ref(),
                role: user.role.as_str(),
                password_hash: user.password_hash.as_deref(),
                google_id: user.google_id.as_deref(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::id.eq(*id.as_uuid()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::email.eq(email.to_string()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::username.eq(username.to_string()))
    }

    async fn find_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        find_user!(self, users::google_id.eq(google_id))
    }

    async fn link_google_id(
        &self,
        id: UserId,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::google_id.eq(google_id),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn row(role: &str, email: &str) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: uuid::Uuid::new_v4(),
            email: email.into(),
            username: "adminUser".into(),
            role: role.into(),
            password_hash: None,
            google_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn converts_valid_rows() {
        let user = row_to_user(row("admin", "admin@example.com")).expect("valid row");
        assert_eq!(user.role, Role::Admin);
    }

    #[rstest]
    #[case("owner", "admin@example.com")]
    #[case("user", "broken")]
    fn corrupt_rows_are_query_errors(#[case] role: &str, #[case] email: &str) {
        let err = row_to_user(row(role, email)).expect_err("corrupt row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
