//! Main entry point for the session service backend.
//!
//! This file initializes logging and configuration, connects to the
//! credential store (retrying a bounded number of times), builds the
//! authentication service and serves the Axum router.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod state;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use auth::cookie::SessionCookies;
use auth::password::PasswordHasher;
use auth::service::AuthService;
use config::Config;
use database::Database;
use repositories::user_repository::UserRepository;
use state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utils::jwt::JwtUtils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_default_secret() {
        warn!(
            "JWT_SECRET is not set; sessions are signed with the built-in development secret. \
             Set JWT_SECRET before deploying."
        );
    }

    let db = Database::new(&config).await?;
    let pool = db.pool().clone();

    let hasher = PasswordHasher::new(config.bcrypt_cost)
        .context("invalid BCRYPT_COST")?;

    let auth_service = AuthService::new(
        Arc::new(UserRepository::new(pool.clone())),
        hasher,
        JwtUtils::new(&config.jwt_secret),
        SessionCookies::new(config.cookie_secure),
    );

    let app = api::router(AppState::new(auth_service, pool));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    info!("Starting session service on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
