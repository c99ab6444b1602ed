//! Defines the HTTP routes for system resource reporting.

use super::handlers::get_system_stats;
use crate::auth::middleware::session_auth;
use axum::{Router, middleware, routing::get};

pub fn system_router() -> Router {
    Router::new().route(
        "/system-stats",
        get(get_system_stats).layer(middleware::from_fn(session_auth)),
    )
}
