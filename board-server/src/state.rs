//! Application state for board-server

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::{IdeaStore, MemoryStore, PgStore, StoreResult};
use crate::error::ServiceResult;
use crate::live::BoardHub;
use crate::notify::{LogNotifier, OwnerNotifier, WebhookNotifier};
use crate::reactions::ReactionLimiter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Idea persistence (PostgreSQL or in-memory)
    pub store: Arc<dyn IdeaStore>,
    /// Live connections per board
    pub hub: BoardHub,
    /// Thumbs-up / emoji throttling
    pub limiter: ReactionLimiter,
    /// Owner feedback notifications
    pub notifier: Arc<dyn OwnerNotifier>,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Upper bound for a single store call
    pub store_timeout: Duration,
}

impl AppState {
    /// Build state from configuration, connecting to PostgreSQL when configured
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn IdeaStore> = match config.database_url {
            Some(ref url) => {
                let store = PgStore::connect(url).await?;
                tracing::info!("PostgreSQL store ready");
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let notifier: Arc<dyn OwnerNotifier> = match config.notify_webhook_url {
            Some(ref url) => Arc::new(WebhookNotifier::new(url.clone())?),
            None => Arc::new(LogNotifier),
        };

        Ok(Self::with_store(config, store, notifier))
    }

    /// Build state around an existing store (tests, embedding)
    pub fn with_store(
        config: &Config,
        store: Arc<dyn IdeaStore>,
        notifier: Arc<dyn OwnerNotifier>,
    ) -> Self {
        Self {
            store,
            hub: BoardHub::new(config.max_connections_per_board),
            limiter: ReactionLimiter::new(),
            notifier,
            jwt_secret: config.jwt_secret.clone(),
            store_timeout: config.store_timeout,
        }
    }

    /// Run a store call under the configured timeout
    pub async fn bounded<T, F>(&self, call: F) -> ServiceResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        Ok(tokio::time::timeout(self.store_timeout, call).await??)
    }
}
