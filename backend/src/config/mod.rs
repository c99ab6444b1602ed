//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL and pool sizing, the session signing secret, the password
//! hashing cost and the server port. Values are read once at startup and
//! passed down explicitly.

use anyhow::{Context, Result};
use std::env;

/// Development-only signing secret used when `JWT_SECRET` is not set.
pub const DEFAULT_JWT_SECRET: &str = "default_fallback_secret_change_me";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub connect_retries: u32,
    pub connect_retry_delay_seconds: u64,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://auth.db".to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let connect_retries = env::var("DB_CONNECT_RETRIES")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_CONNECT_RETRIES must be a valid number")?;

        let connect_retry_delay_seconds = env::var("DB_CONNECT_RETRY_DELAY_SECONDS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .context("DB_CONNECT_RETRY_DELAY_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(cost) => cost
                .parse::<u32>()
                .context("BCRYPT_COST must be a valid number")?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        let cookie_secure = env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .context("COOKIE_SECURE must be true or false")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            connect_retries,
            connect_retry_delay_seconds,
            jwt_secret,
            bcrypt_cost,
            cookie_secure,
            server_port,
        })
    }

    /// Whether the process is signing sessions with the built-in development secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
