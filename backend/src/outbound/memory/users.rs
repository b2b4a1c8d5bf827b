//! User accounts.

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, NewUser, User, UserId, Username};

use super::MemoryStore;

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables.lock().await;
        let taken = tables.users.iter().any(|existing| {
            existing.email == user.email
                || existing.username == user.username
                || (user.google_id.is_some() && existing.google_id == user.google_id)
        });
        if taken {
            return Err(UserPersistenceError::conflict(user.email.as_ref()));
        }
        let now = self.clock.utc();
        let created = User {
            id: UserId::random(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            password_hash: user.password_hash.clone(),
            google_id: user.google_id.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| &user.email == email).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn find_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn link_google_id(
        &self,
        id: UserId,
        google_id: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.tables.lock().await;
        if tables
            .users
            .iter()
            .any(|user| user.id != id && user.google_id.as_deref() == Some(google_id))
        {
            return Err(UserPersistenceError::conflict(google_id));
        }
        let now = self.clock.utc();
        Ok(tables.users.iter_mut().find(|user| user.id == id).map(|user| {
            user.google_id = Some(google_id.to_owned());
            user.updated_at = now;
            user.clone()
        }))
    }
}
