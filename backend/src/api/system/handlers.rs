//! Handler functions for the system statistics endpoint.
//!
//! Reports host and process resource usage alongside the state of the
//! credential store's connection pool. Only reachable behind the session gate.

use crate::api::common::{ApiError, ApiResponse, service_error_to_http};
use crate::api::system::monitor::BackendStats;
use crate::errors::ServiceError;
use crate::state::AppState;
use crate::utils::jwt::AuthenticatedUser;
use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Connection pool figures and a liveness probe
#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub status: String,
    pub open_connections: u32,
    pub idle: usize,
    pub in_use: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStats {
    pub backend: BackendStats,
    pub database: DatabaseStats,
    pub timestamp: String,
}

/// Returns current resource usage.
#[axum::debug_handler]
pub async fn get_system_stats(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<SystemStats>>, ApiError> {
    tracing::debug!("System stats requested by user {}", user.user_id);

    let database = database_stats(&state.pool).await;
    // sysinfo refreshes read procfs synchronously.
    let monitor = Arc::clone(&state.monitor);
    let backend = tokio::task::spawn_blocking(move || monitor.sample())
        .await
        .map_err(|e| {
            service_error_to_http(ServiceError::internal_error(format!(
                "Stats sampling task failed: {}",
                e
            )))
        })?;

    Ok(Json(ApiResponse::success(
        SystemStats {
            backend,
            database,
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
        "System stats retrieved successfully",
    )))
}

async fn database_stats(pool: &SqlitePool) -> DatabaseStats {
    let open_connections = pool.size();
    let idle = pool.num_idle();
    let in_use = (open_connections as usize).saturating_sub(idle);

    let version = match sqlx::query_scalar::<_, String>("SELECT sqlite_version()")
        .fetch_one(pool)
        .await
    {
        Ok(version) => Some(version),
        Err(e) => {
            tracing::error!("Database liveness probe failed: {}", e);
            None
        }
    };

    DatabaseStats {
        status: if version.is_some() {
            "connected".to_string()
        } else {
            "disconnected".to_string()
        },
        open_connections,
        idle,
        in_use,
        version,
    }
}
