//! Database Test Utilities
//!
//! Starts PostgreSQL in a container, applies the `infra_db` migrations and
//! wires coordinators to the Postgres adapters.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tokio::sync::OnceCell;

use domain_claims::ResolutionCoordinator;
use domain_items::ItemRegistry;
use infra_db::{
    DatabaseConfig, DatabaseError, PostgresAcceptanceAdapter, PostgresClaimAdapter,
    PostgresItemAdapter, PostgresReturnAdapter,
};

const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "test_user";
const POSTGRES_PASSWORD: &str = "test_password";
const POSTGRES_DB: &str = "lostfound_test";

/// Tables in dependency order, children first
const TABLES: [&str; 4] = ["successful_returns", "claims", "lost_items", "found_items"];

pub type TestDbError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for test database
#[derive(Debug, Clone)]
pub struct TestDatabaseConfig {
    pub user: String,
    pub password: String,
    pub database: String,
    pub host: String,
    pub port: u16,
}

impl Default for TestDatabaseConfig {
    fn default() -> Self {
        Self {
            user: POSTGRES_USER.to_string(),
            password: POSTGRES_PASSWORD.to_string(),
            database: POSTGRES_DB.to_string(),
            host: "localhost".to_string(),
            port: 5432,
        }
    }
}

impl TestDatabaseConfig {
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// The image logs readiness once during init and again after its restart,
/// so the first connection attempts may be refused
async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let mut attempts = 0;
    loop {
        match infra_db::create_pool(config).await {
            Ok(pool) => return Ok(pool),
            Err(_) if attempts < 20 => {
                attempts += 1;
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// A migrated PostgreSQL instance running in a container
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub config: TestDatabaseConfig,
    pub pool: PgPool,
}

impl TestDatabase {
    /// Starts a container and applies the migrations
    pub async fn new() -> Result<Self, TestDbError> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let port = container.get_host_port_ipv4(5432).await?;
        let host = container.get_host().await?.to_string();

        let config = TestDatabaseConfig {
            host,
            port,
            ..TestDatabaseConfig::default()
        };

        let pool = connect_with_retry(
            &DatabaseConfig::new(config.connection_url())
                .with_pool_size(1, 16)
                .with_acquire_timeout(Duration::from_secs(30)),
        )
        .await?;

        infra_db::run_migrations(&pool).await?;

        Ok(Self {
            _container: container,
            config,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Clears all data while keeping the schema
    pub async fn clear_data(&self) -> Result<(), TestDbError> {
        for table in TABLES {
            sqlx::query(&format!("TRUNCATE TABLE {table} CASCADE"))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// A coordinator over the Postgres adapters
    ///
    /// With `transactional` set, acceptance runs as a single transaction.
    pub fn coordinator(&self, transactional: bool) -> ResolutionCoordinator {
        let pool = self.pool.clone();
        let coordinator = ResolutionCoordinator::new(
            ItemRegistry::new(Arc::new(PostgresItemAdapter::new(pool.clone()))),
            Arc::new(PostgresClaimAdapter::new(pool.clone())),
            Arc::new(PostgresReturnAdapter::new(pool.clone())),
        );

        if transactional {
            coordinator.with_transactional_acceptance(Arc::new(PostgresAcceptanceAdapter::new(pool)))
        } else {
            coordinator
        }
    }
}

static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Gets or starts the container shared by every test in the binary
///
/// # Panics
///
/// Panics if the database fails to initialize
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_TEST_DB
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::new()
                    .await
                    .expect("Failed to create shared test database"),
            )
        })
        .await
        .clone()
}

/// Starts a database used by a single test only
pub async fn create_isolated_test_database() -> Result<TestDatabase, TestDbError> {
    TestDatabase::new().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_connection_url() {
        let url = TestDatabaseConfig::default().connection_url();

        assert!(url.starts_with("postgres://"));
        assert!(url.contains(POSTGRES_USER));
        assert!(url.ends_with(POSTGRES_DB));
    }
}
