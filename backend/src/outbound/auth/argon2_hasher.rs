//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) produced with the crate's
//! default parameters. Both operations are CPU bound and run on the blocking
//! pool.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use async_trait::async_trait;
use tokio::task;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// [`PasswordHasher`] backed by Argon2id.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

fn hash_blocking(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::hash(err.to_string())),
    }
}

fn join_error(err: task::JoinError) -> PasswordHashError {
    PasswordHashError::hash(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        task::spawn_blocking(move || hash_blocking(&password))
            .await
            .map_err(join_error)?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        task::spawn_blocking(move || verify_blocking(&password, &hash))
            .await
            .map_err(join_error)?
    }
}
