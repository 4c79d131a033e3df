//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! lost and found test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built reports and timestamps
//! - `builders`: Builder patterns for requests and wired-up coordinators
//! - `database`: PostgreSQL container management for integration tests
//! - `assertions`: Assertion helpers for claim outcomes
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
