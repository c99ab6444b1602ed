//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the `users` table. They differ from the API models in `auth::models`:
//! the password hash lives here and never leaves the credential store layer.

use sqlx::FromRow;

#[derive(Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

// Keep the hash out of logs.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Insert payload for a new user record.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}
