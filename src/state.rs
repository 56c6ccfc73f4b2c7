use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::store::{
    MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore, TaskStore, UserStore,
};

/// Shared application state handed to every handler. Stores are trait
/// objects so tests and DATABASE_URL-less development run against the
/// in-memory backend while production uses Postgres.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn in_memory() -> Self {
        Self {
            tasks: Arc::new(MemoryTaskStore::new()),
            users: Arc::new(MemoryUserStore::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            tasks: Arc::new(PgTaskStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool)),
        }
    }

    /// Pick the backend from config: Postgres when DATABASE_URL is set,
    /// otherwise the in-memory stores.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match &config.database.url {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
                    .connect(url)
                    .await?;
                tracing::info!("connected to Postgres task store");
                Ok(Self::postgres(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory stores (data is not persisted)");
                Ok(Self::in_memory())
            }
        }
    }
}
