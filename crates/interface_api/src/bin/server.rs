//! Lost and Found Desk - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Run against PostgreSQL (default)
//! API_DATABASE_URL=postgres://... cargo run --bin lostfound-api
//!
//! # Run with in-memory storage
//! API_STORAGE=memory cargo run --bin lostfound-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_DB_MAX_CONNECTIONS`, `API_DB_MIN_CONNECTIONS` - pool bounds (default: 10, 2)
//! * `API_DB_ACQUIRE_TIMEOUT_SECS` - wait for a free connection (default: 30)
//! * `API_DB_MAX_LIFETIME_SECS`, `API_DB_IDLE_TIMEOUT_SECS` - connection recycling (default: 1800, 600)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_STORAGE` - `postgres` or `memory` (default: postgres)
//! * `API_TRANSACTIONAL_ACCEPT` - accept claims in a single transaction (default: true)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::{MemoryClaimPort, MemoryReturnPort, ResolutionCoordinator};
use domain_items::{ItemRegistry, MemoryItemPort};
use infra_db::{
    PostgresAcceptanceAdapter, PostgresClaimAdapter, PostgresItemAdapter,
    PostgresReturnAdapter,
};
use interface_api::{
    config::{ApiConfig, StorageBackend},
    create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting lost and found API server"
    );

    let coordinator = build_coordinator(&config).await?;
    let app = create_router(coordinator, config.clone());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wires the coordinator to the configured storage backend
async fn build_coordinator(config: &ApiConfig) -> anyhow::Result<ResolutionCoordinator> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will not survive a restart");
            Ok(ResolutionCoordinator::new(
                ItemRegistry::new(Arc::new(MemoryItemPort::new())),
                Arc::new(MemoryClaimPort::new()),
                Arc::new(MemoryReturnPort::new()),
            ))
        }
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = infra_db::create_pool(&config.database_config())
                .await
                .context("failed to connect to database")?;

            infra_db::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            tracing::info!("Database ready");

            let coordinator = ResolutionCoordinator::new(
                ItemRegistry::new(Arc::new(PostgresItemAdapter::new(pool.clone()))),
                Arc::new(PostgresClaimAdapter::new(pool.clone())),
                Arc::new(PostgresReturnAdapter::new(pool.clone())),
            );

            if config.transactional_accept {
                Ok(coordinator
                    .with_transactional_acceptance(Arc::new(PostgresAcceptanceAdapter::new(pool))))
            } else {
                Ok(coordinator)
            }
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
