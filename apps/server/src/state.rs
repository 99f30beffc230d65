//! Application state

use std::{future::Future, sync::Arc};

use entities::IdAllocator;
use todo_store::{open_store, TodoStore, TodoStoreResult};
use tokio::sync::OnceCell;

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Todo store
    pub store: Arc<dyn TodoStore>,

    /// Todo id allocator
    pub ids: Arc<IdAllocator>,

    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Set once the store is seeded and the allocator has seen every stored id
    primed: Arc<OnceCell<()>>,
}

impl AppState {
    /// Open the configured store, seed it and prime the id allocator.
    pub async fn new(config: ServerConfig) -> Result<Self, StateError> {
        let store = open_store(&config.store_options())
            .await
            .map_err(|e| StateError::Store(e.to_string()))?;

        let state = Self::with_store(config, store);
        if let Err(e) = state.init_data().await {
            tracing::error!(error = %e, "Persistence service is not running");
        }
        Ok(state)
    }

    /// Create state around an already opened store.
    pub fn with_store(config: ServerConfig, store: Arc<dyn TodoStore>) -> Self {
        Self {
            store,
            ids: Arc::new(IdAllocator::new()),
            config: Arc::new(config),
            primed: Arc::new(OnceCell::new()),
        }
    }

    /// Seed the store and advance the allocator past every stored id.
    ///
    /// Runs to completion at most once. A failed attempt leaves the state
    /// unprimed and the next call retries, so id allocation must go through
    /// here first.
    pub async fn init_data(&self) -> ServerResult<()> {
        self.primed.get_or_try_init(|| self.prime()).await?;
        Ok(())
    }

    async fn prime(&self) -> ServerResult<()> {
        if !self.call(self.store.init_data()).await? {
            tracing::warn!("Store did not acknowledge initialization");
        }

        let max_id = self.call(self.store.max_id()).await?;
        self.ids.observe(max_id);
        tracing::info!(next_id = self.ids.current(), "Id allocator primed");
        Ok(())
    }

    /// Await a store call, giving up after the configured timeout.
    pub async fn call<T, F>(&self, fut: F) -> ServerResult<T>
    where
        F: Future<Output = TodoStoreResult<T>>,
    {
        match tokio::time::timeout(self.config.store_timeout(), fut).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ServerError::BackendUnavailable(format!(
                "store call timed out after {}s",
                self.config.store_timeout_secs
            ))),
        }
    }
}

/// State initialization errors
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to open store: {0}")]
    Store(String),
}
