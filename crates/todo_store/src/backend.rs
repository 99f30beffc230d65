//! Backend selection.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{RedisTodoStore, SqlTodoStore, TodoStore, TodoStoreError, TodoStoreResult};

/// Storage technology behind the todo store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    /// SQL table.
    #[serde(alias = "jdbc", alias = "sql")]
    Relational,
    /// Redis hash.
    #[default]
    #[serde(alias = "redis")]
    KeyValue,
}

impl StoreBackend {
    /// Returns the canonical name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Relational => "relational",
            StoreBackend::KeyValue => "key-value",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = TodoStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relational" | "jdbc" | "sql" => Ok(StoreBackend::Relational),
            "key-value" | "key_value" | "redis" => Ok(StoreBackend::KeyValue),
            other => Err(TodoStoreError::other(format!("Unknown store backend: {other}"))),
        }
    }
}

/// Everything needed to open a todo store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Which backend to open.
    pub backend: StoreBackend,
    /// Connection string of the relational backend.
    pub database_url: String,
    /// Connection string of the key-value backend.
    pub redis_url: String,
    /// Password of the key-value backend.
    pub redis_password: Option<String>,
    /// Maximum number of pooled connections of the relational backend.
    pub max_pool_size: u32,
}

/// Opens the store selected by `options.backend`.
pub async fn open_store(options: &StoreOptions) -> TodoStoreResult<Arc<dyn TodoStore>> {
    tracing::info!(backend = %options.backend, "Opening todo store");

    let store: Arc<dyn TodoStore> = match options.backend {
        StoreBackend::Relational => {
            Arc::new(SqlTodoStore::connect(&options.database_url, options.max_pool_size).await?)
        }
        StoreBackend::KeyValue => Arc::new(
            RedisTodoStore::connect(&options.redis_url, options.redis_password.as_deref()).await?,
        ),
    };
    Ok(store)
}
