//! Server configuration

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use todo_store::{StoreBackend, StoreOptions};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0:8082")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Storage technology (relational or key-value)
    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Connection string of the relational store
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Connection string of the key-value store
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Password of the key-value store
    #[serde(default)]
    pub redis_password: Option<String>,

    /// Maximum number of pooled store connections
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// Deadline for a single store call, in seconds
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,

    /// Whether to enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Allowed CORS origins (empty allows any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_bind_address() -> String {
    "0.0.0.0:8082".to_string()
}

fn default_database_url() -> String {
    "sqlite:todo.db?mode=rwc".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_max_pool_size() -> u32 {
    30
}

fn default_store_timeout_secs() -> u64 {
    10
}

fn default_enable_cors() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            store_backend: StoreBackend::default(),
            database_url: default_database_url(),
            redis_url: default_redis_url(),
            redis_password: None,
            max_pool_size: default_max_pool_size(),
            store_timeout_secs: default_store_timeout_secs(),
            enable_cors: default_enable_cors(),
            cors_origins: Vec::new(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional config file and the environment.
    ///
    /// The file overrides the defaults and environment variables override the
    /// file.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let mut config = match Self::find_config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Override fields from variables returned by `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = var("TODO_BIND_ADDRESS") {
            self.bind_address = addr;
        }

        if let Some(backend) = var("TODO_STORE_BACKEND") {
            self.store_backend = backend
                .parse()
                .map_err(|_| ConfigError::Invalid("TODO_STORE_BACKEND", backend))?;
        }

        if let Some(url) = var("DATABASE_URL") {
            self.database_url = url;
        }

        if let Some(url) = var("REDIS_URL") {
            self.redis_url = url;
        }

        if let Some(password) = var("REDIS_PASSWORD") {
            self.redis_password = Some(password);
        }

        if let Some(size) = var("TODO_MAX_POOL_SIZE") {
            self.max_pool_size = size
                .parse()
                .map_err(|_| ConfigError::Invalid("TODO_MAX_POOL_SIZE", size))?;
        }

        if let Some(secs) = var("TODO_STORE_TIMEOUT_SECS") {
            self.store_timeout_secs = secs
                .parse()
                .map_err(|_| ConfigError::Invalid("TODO_STORE_TIMEOUT_SECS", secs))?;
        }

        if let Some(val) = var("TODO_ENABLE_CORS") {
            self.enable_cors = val.parse().unwrap_or(true);
        }

        if let Some(origins) = var("TODO_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(level) = var("TODO_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(val) = var("TODO_LOG_JSON") {
            self.log_json = val == "1" || val.eq_ignore_ascii_case("true");
        }

        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let locations = [
            PathBuf::from("todo-server.toml"),
            PathBuf::from("/etc/todo-server/server.toml"),
            dirs::config_dir()
                .map(|p| p.join("todo-server").join("server.toml"))
                .unwrap_or_default(),
        ];

        locations.into_iter().find(|p| p.is_file())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "max_pool_size",
                self.max_pool_size.to_string(),
            ));
        }

        if self.store_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "store_timeout_secs",
                self.store_timeout_secs.to_string(),
            ));
        }

        Ok(())
    }

    /// Deadline for a single store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Options for opening the configured store.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            backend: self.store_backend,
            database_url: self.database_url.clone(),
            redis_url: self.redis_url.clone(),
            redis_password: self.redis_password.clone(),
            max_pool_size: self.max_pool_size,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),

    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
