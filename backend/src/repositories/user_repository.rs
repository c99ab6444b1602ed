//! Database repository for user credential operations.
//!
//! Provides creation and username lookup for system users.

use super::CredentialStore;
use crate::database::models::{NewUser, User};
use crate::errors::StoreError;
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Repository for user database operations.
///
/// Handles all persistence operations for the User entity. Username
/// uniqueness is enforced by the `UNIQUE` constraint on the table.
#[derive(Clone)]
pub struct UserRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool (cheap to clone)
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - NewUser containing the username and password hash
    ///
    /// # Returns
    /// The newly created User with its generated id
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                StoreError::DuplicateUsername {
                    username: user.username.clone(),
                }
            }
            other => StoreError::Database(other),
        })?;

        Ok(created)
    }

    /// Retrieves a user by their username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
