use crate::{config::AppConfig, db};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Everything a handler needs: the store and the immutable configuration.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;
        Ok(Self { db, config })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Migrated in-memory store with the test configuration.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let db = db::connect_in_memory().await?;
        db::migrate(&db).await?;
        Ok(Self {
            db,
            config: Arc::new(AppConfig::for_tests()),
        })
    }
}
