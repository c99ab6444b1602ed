//! Central module for organizing the application's API endpoints.
//!
//! This module assembles the full router: authentication routes and the
//! protected system statistics route under `/api`, the root banner, the CORS
//! policy and the shared state extension.

pub mod common;
pub mod system;

use crate::api::common::ApiResponse;
use crate::auth;
use crate::state::AppState;
use axum::{
    Extension, Router,
    http::{Method, header},
    response::Json,
    routing::get,
};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the application router around `state`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::routes::auth_router())
        .merge(system::routes::system_router());

    Router::new()
        .route("/", get(root_handler))
        .nest("/api", api)
        .layer(cors_layer())
        .layer(Extension(state))
}

/// Browsers may call from any origin, with credentials, so the origin is
/// echoed back instead of answered with a wildcard.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "sessiongate",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to the session service",
    ))
}
