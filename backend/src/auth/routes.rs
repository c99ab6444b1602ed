//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle registration, login, logout and session inspection.
//! They are designed to be nested under `/api` in the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::session_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route(
            "/session",
            get(session).layer(middleware::from_fn(session_auth)),
        )
}
