//! Password hashing and verification.
//!
//! bcrypt generates a fresh salt per call and embeds it, along with the cost,
//! in the resulting hash string, so nothing besides the hash is stored.
//!
//! Passwords bcrypt cannot take whole are refused instead of truncated, so
//! two passwords sharing a long prefix never verify against each other.

use bcrypt::{BcryptError, non_truncating_hash, non_truncating_verify};

use crate::errors::{ServiceError, ServiceResult};

/// Secret hashed once at construction and verified against when a login
/// names an unknown user.
const DECOY_SECRET: &str = "decoy-password-for-unknown-users";

/// Longest password accepted, in bytes. bcrypt reads 72 bytes including a
/// NUL terminator.
pub const MAX_PASSWORD_BYTES: usize = 71;

/// bcrypt-backed password hasher with a fixed cost.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    decoy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given bcrypt cost.
    ///
    /// # Errors
    /// Returns `ServiceError::InternalError` if the cost is outside the range
    /// bcrypt accepts.
    pub fn new(cost: u32) -> ServiceResult<Self> {
        let decoy_hash = Self::hash_with_cost(DECOY_SECRET, cost)?;
        Ok(Self { cost, decoy_hash })
    }

    /// Hash a password before storing it in the database.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` for a password longer than
    /// [`MAX_PASSWORD_BYTES`] and `ServiceError::InternalError` if hashing
    /// fails; callers must abort rather than store anything.
    pub fn hash(&self, password: &str) -> ServiceResult<String> {
        Self::hash_with_cost(password, self.cost)
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed hash, or a password too long to have been hashed, is
    /// reported as a mismatch.
    pub fn verify(&self, password: &str, password_hash: &str) -> bool {
        match non_truncating_verify(password, password_hash) {
            Ok(matches) => matches,
            Err(BcryptError::Truncation(_)) => false,
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }

    /// Spend the same bcrypt work as a real verification without a real hash.
    pub fn verify_decoy(&self, password: &str) -> bool {
        // The decoy result is never a successful login.
        let _ = non_truncating_verify(password, &self.decoy_hash);
        false
    }

    fn hash_with_cost(password: &str, cost: u32) -> ServiceResult<String> {
        non_truncating_hash(password, cost).map_err(|e| match e {
            BcryptError::Truncation(_) => ServiceError::validation(format!(
                "password: Password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )),
            e => ServiceError::internal_error(format!("Password hashing failed: {}", e)),
        })
    }
}
