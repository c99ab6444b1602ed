//! Core business logic for the authentication system.
//!
//! `AuthService` ties the credential store, the password hasher and the
//! token utilities together. bcrypt work is pushed onto Tokio's blocking pool
//! so it never stalls the request executors.

use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use tracing::{debug, info};
use validator::Validate;

use crate::auth::cookie::SessionCookies;
use crate::auth::models::*;
use crate::auth::password::PasswordHasher;
use crate::database::models::NewUser;
use crate::errors::{ServiceError, ServiceResult, TokenError};
use crate::repositories::CredentialStore;
use crate::utils::jwt::{AuthenticatedUser, JwtUtils};

/// Authentication service for handling registration, login and session checks
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    jwt_utils: JwtUtils,
    cookies: SessionCookies,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        jwt_utils: JwtUtils,
        cookies: SessionCookies,
    ) -> Self {
        AuthService {
            store,
            hasher,
            jwt_utils,
            cookies,
        }
    }

    /// Register a new user.
    ///
    /// Every store failure, a taken username included, is reported as the
    /// same `UserCreationFailed` error.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserInfo> {
        request
            .validate()
            .map_err(|e| ServiceError::from_validation_errors(&e))?;

        let RegisterRequest { username, password } = request;

        let hasher = self.hasher.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Hashing task failed: {}", e)))??;

        let user = self
            .store
            .create_user(NewUser {
                username,
                password_hash,
            })
            .await
            .map_err(ServiceError::user_creation_failed)?;

        info!("Registered user {}", user.id);

        Ok(UserInfo {
            id: user.id,
            username: user.username,
        })
    }

    /// Authenticate a user and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail identically, and both pay
    /// for one bcrypt verification.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<Session> {
        request
            .validate()
            .map_err(|e| ServiceError::from_validation_errors(&e))?;

        let LoginRequest { username, password } = request;

        let user = self.store.find_by_username(&username).await?;

        let hasher = self.hasher.clone();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = tokio::task::spawn_blocking(move || match stored_hash {
            Some(stored_hash) => hasher.verify(&password, &stored_hash),
            None => hasher.verify_decoy(&password),
        })
        .await
        .map_err(|e| ServiceError::internal_error(format!("Verification task failed: {}", e)))?;

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                return Err(ServiceError::invalid_credentials(format!(
                    "password mismatch for user {}",
                    user.id
                )));
            }
            None => return Err(ServiceError::invalid_credentials("unknown username")),
        };

        let issued = self
            .jwt_utils
            .generate_token(user.id)
            .map_err(|e| ServiceError::internal_error(e.to_string()))?;

        info!("User {} logged in", user.id);

        Ok(Session {
            token: issued.token,
            user: UserInfo {
                id: user.id,
                username: user.username,
            },
            expires_at: issued.expires_at,
        })
    }

    /// Cookie that hands a session to the client.
    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        self.cookies.session(session.token.clone())
    }

    /// End the client's session.
    ///
    /// Only the cookie is expired. The token itself stays valid until its
    /// own expiry.
    pub fn logout(&self) -> Cookie<'static> {
        debug!("Expiring session cookie");
        self.cookies.removal()
    }

    /// Verify a session token.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        self.jwt_utils.validate_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::repositories::memory_store::InMemoryCredentialStore;

    const SECRET: &str = "service-test-secret";

    fn service_with(store: Arc<InMemoryCredentialStore>) -> AuthService {
        AuthService::new(
            store,
            PasswordHasher::new(4).unwrap(),
            JwtUtils::new(SECRET),
            SessionCookies::new(false),
        )
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_yields_token_for_user() {
        let service = service_with(Arc::new(InMemoryCredentialStore::new()));

        let user = service
            .register(register_request("alice", "s3cret"))
            .await
            .unwrap();
        let session = service.login(login_request("alice", "s3cret")).await.unwrap();

        assert_eq!(session.user, user);
        let verified = service.authenticate(&session.token).unwrap();
        assert_eq!(verified.user_id, user.id);
        assert_eq!(verified.expires_at, session.expires_at);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let service = service_with(store.clone());

        service
            .register(register_request("alice", "s3cret"))
            .await
            .unwrap();

        let stored = store.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "s3cret");
        assert!(!stored.password_hash.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let service = service_with(store.clone());

        for (username, password) in [("", "pw"), ("bob", ""), ("", "")] {
            let result = service
                .register(register_request(username, password))
                .await;
            assert!(matches!(result, Err(ServiceError::Validation { .. })));
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_overlong_password_is_rejected_not_truncated() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let service = service_with(store.clone());
        let password = format!("{}A", "x".repeat(72));

        let result = service.register(register_request("grace", &password)).await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
        assert_eq!(store.len(), 0);

        service
            .register(register_request("grace", &"x".repeat(71)))
            .await
            .unwrap();
        let login = service
            .login(login_request("grace", &format!("{}B", "x".repeat(72))))
            .await;
        assert!(matches!(login, Err(ServiceError::InvalidCredentials { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails_and_keeps_original() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let service = service_with(store.clone());

        let first = service
            .register(register_request("carol", "first-password"))
            .await
            .unwrap();
        let second = service
            .register(register_request("carol", "second-password"))
            .await;

        assert!(matches!(
            second,
            Err(ServiceError::UserCreationFailed {
                source: StoreError::DuplicateUsername { .. }
            })
        ));
        assert_eq!(store.len(), 1);

        let session = service
            .login(login_request("carol", "first-password"))
            .await
            .unwrap();
        assert_eq!(session.user.id, first.id);
        assert!(
            service
                .login(login_request("carol", "second-password"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_store_failure_on_register_is_creation_failure() {
        let store = Arc::new(InMemoryCredentialStore::new());
        store.set_unavailable(true);
        let service = service_with(store);

        let result = service.register(register_request("dave", "pw")).await;

        assert!(matches!(
            result,
            Err(ServiceError::UserCreationFailed {
                source: StoreError::Database(_)
            })
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_fail_alike() {
        let service = service_with(Arc::new(InMemoryCredentialStore::new()));
        service
            .register(register_request("erin", "right"))
            .await
            .unwrap();

        let wrong_password = service
            .login(login_request("erin", "wrong"))
            .await
            .unwrap_err();
        let unknown_user = service
            .login(login_request("mallory", "right"))
            .await
            .unwrap_err();

        assert!(matches!(
            wrong_password,
            ServiceError::InvalidCredentials { .. }
        ));
        assert!(matches!(unknown_user, ServiceError::InvalidCredentials { .. }));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields() {
        let service = service_with(Arc::new(InMemoryCredentialStore::new()));

        let result = service.login(login_request("", "")).await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_on_login_is_store_error() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let service = service_with(store.clone());
        service
            .register(register_request("frank", "pw"))
            .await
            .unwrap();
        store.set_unavailable(true);

        let result = service.login(login_request("frank", "pw")).await;

        assert!(matches!(result, Err(ServiceError::Store { .. })));
    }

    #[tokio::test]
    async fn test_token_from_other_service_is_rejected() {
        let service = service_with(Arc::new(InMemoryCredentialStore::new()));
        let foreign = JwtUtils::new("another-secret").generate_token(1).unwrap();

        assert!(service.authenticate(&foreign.token).is_err());
    }

    #[tokio::test]
    async fn test_logout_returns_expired_cookie() {
        let service = service_with(Arc::new(InMemoryCredentialStore::new()));

        let cookie = service.logout();

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
