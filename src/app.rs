use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    config,
    database::{BudgetPolicy, MemoryStore, PgStore, Store},
};

#[derive(Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub store: Arc<dyn Store>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let store: Arc<dyn Store> = if cfg.db.in_memory {
            tracing::warn!("using in-memory store, data will be lost on shutdown");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(PgStore::connect(&cfg.db).await.change_context(AppError)?)
        };

        Ok(Self::with_store(cfg, store))
    }

    #[must_use]
    pub fn with_store(cfg: config::Server, store: Arc<dyn Store>) -> Self {
        Self {
            config: Arc::new(cfg),
            store,
        }
    }

    /// App with the test configuration and an empty [`MemoryStore`],
    /// returned alongside so tests can seed and inspect it.
    #[must_use]
    pub fn new_for_tests() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let app = Self::with_store(config::Server::for_tests(), store.clone());
        (app, store)
    }

    #[must_use]
    pub fn budget_policy(&self) -> BudgetPolicy {
        BudgetPolicy {
            default_available: self.config.likes.default_available,
            restore_on_unlike: self.config.likes.restore_budget_on_unlike,
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("store", &self.store.kind())
            .finish()
    }
}
