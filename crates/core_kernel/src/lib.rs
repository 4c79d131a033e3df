//! Core Kernel - Foundational types shared by every lost and found crate
//!
//! This crate provides the building blocks used across the domain modules:
//! - Strongly typed identifiers for reports, claims, returns and users
//! - Port infrastructure (errors, health checks) for the hexagonal layout

pub mod identifiers;
pub mod ports;

pub use identifiers::{FoundItemId, LostItemId, ClaimId, ReturnId, UserId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
