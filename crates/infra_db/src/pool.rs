//! Connection pool setup and schema migrations

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DatabaseError;

/// Type alias for the PostgreSQL connection pool
pub type DatabasePool = PgPool;

/// Pool sizing and timeouts for the desk's database
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use infra_db::DatabaseConfig;
///
/// let config = DatabaseConfig::new("postgres://localhost/lostfound")
///     .with_pool_size(2, 20)
///     .with_acquire_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_connections, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a free connection
    pub acquire_timeout: Duration,
    /// Connections older than this are closed instead of reused
    pub max_lifetime: Duration,
    /// Idle connections above `min_connections` are closed after this
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(30 * 60),
            idle_timeout: Duration::from_secs(10 * 60),
        }
    }

    /// Sets the pool bounds; `min` is capped at `max`
    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.max_connections = max.max(1);
        self.min_connections = min.min(self.max_connections);
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Sets how long connections live and how long they may sit idle
    pub fn with_recycling(mut self, max_lifetime: Duration, idle_timeout: Duration) -> Self {
        self.max_lifetime = max_lifetime;
        self.idle_timeout = idle_timeout;
        self
    }

    /// Pool options carrying these settings, not yet connected
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .max_lifetime(self.max_lifetime)
            .idle_timeout(self.idle_timeout)
    }
}

/// Opens a pool against `config.url`
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` if no connection can be made
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        max_lifetime_secs = config.max_lifetime.as_secs(),
        "Creating database pool"
    );

    let pool = config
        .pool_options()
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Database pool created");
    Ok(pool)
}

/// Applies the schema migrations under `migrations/`
///
/// Creates the four tables (found items, lost items, claims, successful
/// returns) and the unique indexes that back the claim invariants.
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_caps_min_at_max() {
        let config = DatabaseConfig::new("postgres://test").with_pool_size(8, 4);
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.min_connections, 4);

        let config = DatabaseConfig::new("postgres://test").with_pool_size(0, 0);
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.min_connections, 0);
    }

    #[test]
    fn test_pool_options_carry_settings() {
        let config = DatabaseConfig::new("postgres://test")
            .with_pool_size(1, 16)
            .with_acquire_timeout(Duration::from_secs(3))
            .with_recycling(Duration::from_secs(600), Duration::from_secs(60));

        let options = config.pool_options();
        assert_eq!(options.get_max_connections(), 16);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(600)));
        assert_eq!(options.get_idle_timeout(), Some(Duration::from_secs(60)));
    }
}
