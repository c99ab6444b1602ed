//! Module for database connection setup and common utilities.
//!
//! This module is responsible for initializing the database connection pool,
//! retrying the initial connection a bounded number of times, and applying
//! the schema migrations before the server starts accepting traffic.

use crate::config::Config;
use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

pub mod models;

pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    /// Initializes the database connection pool.
    ///
    /// The first connection is attempted up to `connect_retries` times with a
    /// fixed delay between attempts. Running out of attempts is an error the
    /// caller must treat as fatal.
    pub async fn new(config: &Config) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("DATABASE_URL is not a valid SQLite connection string")?
            .create_if_missing(true);

        let attempts = config.connect_retries.max(1);
        let delay = Duration::from_secs(config.connect_retry_delay_seconds);

        let mut attempt = 1;
        let pool = loop {
            let result = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
                .connect_with(options.clone())
                .await;

            match result {
                Ok(pool) => break pool,
                Err(e) if attempt < attempts => {
                    warn!(
                        "Database connection attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, attempts, e, delay
                    );
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("failed to connect to database after {} attempts", attempts)
                    });
                }
            }
        };

        info!("Database connection established");

        let db = Database { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .context("failed to run database migrations")?;
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}
