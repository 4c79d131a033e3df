//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! Each adapter:
//! - Implements one domain port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::{PostgresItemAdapter, PostgresClaimAdapter, PostgresReturnAdapter};
//!
//! let items = ItemRegistry::new(Arc::new(PostgresItemAdapter::new(pool.clone())));
//! let coordinator = ResolutionCoordinator::new(
//!     items,
//!     Arc::new(PostgresClaimAdapter::new(pool.clone())),
//!     Arc::new(PostgresReturnAdapter::new(pool.clone())),
//! )
//! .with_transactional_acceptance(Arc::new(PostgresAcceptanceAdapter::new(pool)));
//! ```

use std::time::Instant;

use core_kernel::HealthCheckResult;
use sqlx::PgPool;

pub mod items;
pub mod claims;
pub mod returns;
pub mod acceptance;

pub use items::PostgresItemAdapter;
pub use claims::PostgresClaimAdapter;
pub use returns::PostgresReturnAdapter;
pub use acceptance::PostgresAcceptanceAdapter;

/// Checks database connectivity with `SELECT 1`
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}
