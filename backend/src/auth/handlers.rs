//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for registration, login,
//! logout and session inspection, delegate to `auth::service` for the core
//! logic, and translate the outcome into cookies and JSON responses.

use crate::api::common::{ApiError, ApiResponse, json_rejection_to_http, service_error_to_http};
use crate::auth::models::*;
use crate::state::AppState;
use crate::utils::jwt::{AuthenticatedUser, SESSION_TTL_SECONDS};
use axum::{
    extract::{Extension, Json, rejection::JsonRejection},
    response::Json as ResponseJson,
};
use axum_extra::extract::cookie::CookieJar;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(state): Extension<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<UserInfo>>, ApiError> {
    let Json(payload) = payload.map_err(json_rejection_to_http)?;

    match state.auth.register(payload).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "Registration successful",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request; on success the token is set as an HTTP-only cookie
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<LoginResponse>>), ApiError> {
    let Json(payload) = payload.map_err(json_rejection_to_http)?;

    let session = state
        .auth
        .login(payload)
        .await
        .map_err(service_error_to_http)?;

    let jar = jar.add(state.auth.session_cookie(&session));

    let response = LoginResponse {
        user: session.user,
        expires_at: session.expires_at,
        expires_in: SESSION_TTL_SECONDS,
    };

    Ok((
        jar,
        ResponseJson(ApiResponse::success(response, "Login successful")),
    ))
}

/// Handle logout request
///
/// The cookie is expired on the client. Tokens are stateless, so a copy of
/// the token captured elsewhere keeps working until it expires on its own.
#[axum::debug_handler]
pub async fn logout(
    Extension(state): Extension<AppState>,
    jar: CookieJar,
) -> (CookieJar, ResponseJson<ApiResponse<()>>) {
    let jar = jar.add(state.auth.logout());

    (
        jar,
        ResponseJson(ApiResponse::<()>::message("Logout successful")),
    )
}

/// Get the current session from the verified token
#[axum::debug_handler]
pub async fn session(
    Extension(user): Extension<AuthenticatedUser>,
) -> ResponseJson<ApiResponse<SessionResponse>> {
    ResponseJson(ApiResponse::success(
        SessionResponse {
            user_id: user.user_id,
            expires_at: user.expires_at,
        },
        "Session is active",
    ))
}
