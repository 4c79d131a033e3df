//! API configuration

use std::time::Duration;

use serde::Deserialize;

use infra_db::DatabaseConfig;

/// Where the desk keeps its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through `infra_db`
    Postgres,
    /// Process-local maps; data is lost on restart
    Memory,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Pooled connections are recycled after this many seconds
    pub db_max_lifetime_secs: u64,
    pub db_idle_timeout_secs: u64,
    /// Log level
    pub log_level: String,
    /// Storage backend
    pub storage: StorageBackend,
    /// Run each acceptance as one database transaction (Postgres only)
    pub transactional_accept: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/lostfound".to_string(),
            db_max_connections: 10,
            db_min_connections: 2,
            db_acquire_timeout_secs: 30,
            db_max_lifetime_secs: 30 * 60,
            db_idle_timeout_secs: 10 * 60,
            log_level: "info".to_string(),
            storage: StorageBackend::Postgres,
            transactional_accept: true,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_`-prefixed environment variables
    ///
    /// Unset keys fall back to [`ApiConfig::default`].
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiration_secs", defaults.jwt_expiration_secs as i64)?
            .set_default("database_url", defaults.database_url)?
            .set_default("db_max_connections", i64::from(defaults.db_max_connections))?
            .set_default("db_min_connections", i64::from(defaults.db_min_connections))?
            .set_default("db_acquire_timeout_secs", defaults.db_acquire_timeout_secs as i64)?
            .set_default("db_max_lifetime_secs", defaults.db_max_lifetime_secs as i64)?
            .set_default("db_idle_timeout_secs", defaults.db_idle_timeout_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("storage", "postgres")?
            .set_default("transactional_accept", defaults.transactional_accept)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for the Postgres backend
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .with_pool_size(self.db_min_connections, self.db_max_connections)
            .with_acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
            .with_recycling(
                Duration::from_secs(self.db_max_lifetime_secs),
                Duration::from_secs(self.db_idle_timeout_secs),
            )
    }
}
