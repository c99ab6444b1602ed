//! Shared application state handed to every handler through an `Extension`.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::api::system::monitor::SystemMonitor;
use crate::auth::service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub pool: SqlitePool,
    pub monitor: Arc<SystemMonitor>,
}

impl AppState {
    pub fn new(auth: AuthService, pool: SqlitePool) -> Self {
        Self {
            auth: Arc::new(auth),
            pool,
            monitor: Arc::new(SystemMonitor::new()),
        }
    }
}
