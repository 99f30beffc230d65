//! Todo store error types.

use thiserror::Error;

/// Errors that can occur during todo store operations.
#[derive(Debug, Error)]
pub enum TodoStoreError {
    /// Relational database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl TodoStoreError {
    /// Creates an error from a message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for todo store operations.
pub type TodoStoreResult<T> = Result<T, TodoStoreError>;
