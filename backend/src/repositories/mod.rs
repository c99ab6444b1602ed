//! Persistence boundary for user credentials.
//!
//! The auth service only talks to a [`CredentialStore`]; the SQLite-backed
//! [`user_repository::UserRepository`] is the production implementation.

use crate::database::models::{NewUser, User};
use crate::errors::StoreError;
use async_trait::async_trait;

#[cfg(test)]
pub mod memory_store;
pub mod user_repository;

/// Capability interface over the users relation.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new user. Fails with [`StoreError::DuplicateUsername`] when
    /// the username is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Looks a user up by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}
