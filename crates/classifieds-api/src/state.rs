use std::sync::Arc;

use chrono::TimeDelta;
use tracing::error;

use classifieds_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub config: SiteConfig,
}

/// Process-wide settings handed to the handlers. Built once at startup;
/// handlers never read the environment themselves.
#[derive(Clone)]
pub struct SiteConfig {
    pub jwt_secret: String,
    pub token_ttl: TimeDelta,
    pub session_ttl: TimeDelta,
    /// Feature list shown on the home page.
    pub installed: Vec<String>,
}

impl AppStateInner {
    pub fn new(db: Database, config: SiteConfig) -> AppState {
        Arc::new(Self { db, config })
    }

    /// Runs blocking store work off the async runtime.
    pub async fn with_db<F, T>(self: &Arc<Self>, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || f(&state.db))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal(anyhow::anyhow!("blocking task failed: {}", e))
            })?
    }
}
