//! JWT token utilities for session authentication.
//!
//! Provides token creation and validation for the session cookie. Tokens are
//! HS256-signed, carry the user id as `sub`, and expire a fixed
//! [`SESSION_TTL_SECONDS`] after issuance.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::errors::TokenError;

/// Validity window of a session token: 72 hours.
pub const SESSION_TTL_SECONDS: i64 = 72 * 60 * 60;

/// JWT Claims structure as it appears on the wire
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issued at timestamp
    pub iat: i64,
}

/// Identity established by a successfully verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token utility for creating and validating session tokens
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtUtils {
    /// Create a new JwtUtils instance bound to `secret`.
    pub fn new(secret: &str) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Only HS256 is accepted. Expiry is checked in `validate_token_at`
        // so that it can run against an explicit clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generate a session token for `user_id`, valid from now.
    pub fn generate_token(&self, user_id: i64) -> Result<IssuedToken, TokenError> {
        self.generate_token_at(user_id, Utc::now())
    }

    /// Generate a session token as if issued at `issued_at`.
    pub fn generate_token_at(
        &self,
        user_id: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at + Duration::seconds(SESSION_TTL_SECONDS);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate and decode a session token against the current time.
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Validate and decode a session token against `now`.
    ///
    /// A token is valid while `now` is strictly before its `exp`.
    pub fn validate_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::UnsupportedAlgorithm
                }
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired {
                expired_at: claims.exp,
            });
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed(format!("invalid subject '{}'", claims.sub)))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::Malformed(format!("invalid expiry {}", claims.exp)))?;

        Ok(AuthenticatedUser {
            user_id,
            expires_at,
        })
    }
}
