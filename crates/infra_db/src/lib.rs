//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the lost and found desk, using SQLx.
//!
//! # Architecture
//!
//! Repositories hold the SQL and work on plain row structs. Adapters wrap
//! them and implement the domain ports (`ItemPort`, `ClaimPort`,
//! `ReturnPort`, `AcceptancePort`), translating rows and errors.
//!
//! # Concurrency
//!
//! Every state change the claim protocol depends on is a single
//! conditional statement or runs inside one transaction:
//!
//! - `UPDATE found_items ... WHERE is_claimed = $2`
//! - `UPDATE claims ... WHERE status = 'pending'`
//! - unique indexes for one pending claim per claimant and item, one
//!   accepted claim per item, and one return per item
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//!
//! let pool = create_pool(&DatabaseConfig::new("postgres://localhost/lostfound")).await?;
//! run_migrations(&pool).await?;
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::{
    PostgresItemAdapter, PostgresClaimAdapter, PostgresReturnAdapter, PostgresAcceptanceAdapter,
};
