//! Middleware for protecting authenticated routes.
//!
//! This module contains the session gate: it reads the `token` cookie,
//! verifies it and either rejects the request or passes the verified
//! identity on to the handler.

use crate::api::common::{ApiError, unauthorized};
use crate::auth::cookie::SESSION_COOKIE_NAME;
use crate::state::AppState;
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

/// Session cookie authentication middleware
///
/// A missing cookie, an unreadable cookie and a token that fails
/// verification all produce the same 401 response.
pub async fn session_auth(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(request.headers());

    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        debug!("Rejected request to {}: no session cookie", request.uri().path());
        return Err(unauthorized());
    };

    match state.auth.authenticate(cookie.value()) {
        Ok(user) => {
            // Add the verified identity to request extensions for use in handlers
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Err(e) => {
            debug!("Rejected request to {}: {}", request.uri().path(), e);
            Err(unauthorized())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookie::SessionCookies;
    use crate::auth::password::PasswordHasher;
    use crate::auth::service::AuthService;
    use crate::database::test_pool;
    use crate::repositories::memory_store::InMemoryCredentialStore;
    use crate::utils::jwt::{AuthenticatedUser, JwtUtils};
    use axum::{
        Router,
        body::Body,
        http::{
            StatusCode,
            header::{CONTENT_TYPE, COOKIE},
        },
        middleware,
        routing::get,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "gate-test-secret";

    async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> String {
        user.user_id.to_string()
    }

    async fn app() -> Router {
        let auth = AuthService::new(
            Arc::new(InMemoryCredentialStore::new()),
            PasswordHasher::new(4).unwrap(),
            JwtUtils::new(SECRET),
            SessionCookies::new(false),
        );
        let state = AppState::new(auth, test_pool().await);

        Router::new()
            .route(
                "/protected",
                get(whoami).layer(middleware::from_fn(session_auth)),
            )
            .layer(Extension(state))
    }

    async fn call(app: Router, cookie: Option<&str>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri("/protected");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        }
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_is_admitted_with_identity() {
        let token = JwtUtils::new(SECRET).generate_token(17).unwrap().token;

        let (status, body) = call(app().await, Some(&format!("token={}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "17");
    }

    #[tokio::test]
    async fn test_rejections_are_indistinguishable() {
        let foreign = JwtUtils::new("other-secret").generate_token(17).unwrap().token;
        let expired = JwtUtils::new(SECRET)
            .generate_token_at(17, chrono::Utc::now() - chrono::Duration::hours(73))
            .unwrap()
            .token;

        let no_cookie = call(app().await, None).await;
        let other_cookie = call(app().await, Some("session=abc")).await;
        let empty = call(app().await, Some("token=")).await;
        let garbage = call(app().await, Some("token=not.a.jwt")).await;
        let wrong_secret = call(app().await, Some(&format!("token={}", foreign))).await;
        let stale = call(app().await, Some(&format!("token={}", expired))).await;

        let rejected: Vec<(StatusCode, serde_json::Value)> =
            [no_cookie, other_cookie, empty, garbage, wrong_secret, stale]
                .into_iter()
                .map(|(status, body)| {
                    let mut json: serde_json::Value = serde_json::from_str(&body).unwrap();
                    json.as_object_mut().unwrap().remove("timestamp");
                    (status, json)
                })
                .collect();

        for response in &rejected {
            assert_eq!(response.0, StatusCode::UNAUTHORIZED);
            assert_eq!(response.1, rejected[0].1);
        }
        assert_eq!(rejected[0].1["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_token_among_other_cookies_is_found() {
        let token = JwtUtils::new(SECRET).generate_token(3).unwrap().token;

        let (status, body) = call(
            app().await,
            Some(&format!("theme=dark; token={}; lang=en", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "3");
    }
}
