//! Item Reporting Domain
//!
//! This crate holds the two kinds of report people file with the lost and
//! found desk, and the registry that owns their `claimed` flag.
//!
//! - **FoundItemReport**: filed by a finder, carries a security question that
//!   claimants answer to prove ownership
//! - **LostItemReport**: filed by an owner, optionally referenced by a claim
//!
//! The `claimed` flag of a found item is a concurrency gate: it only changes
//! through [`ItemRegistry::try_mark_claimed`], a compare-and-swap on the
//! underlying [`ItemPort`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_items::{ItemRegistry, NewFoundItem};
//!
//! let registry = ItemRegistry::new(port);
//! let report = registry.report_found_item(finder_id, request).await?;
//! assert!(registry.try_mark_claimed(report.id, false).await?);
//! assert!(!registry.try_mark_claimed(report.id, false).await?);
//! ```

pub mod report;
pub mod error;
pub mod ports;
pub mod registry;

pub use report::{
    FoundItemReport, LostItemReport, NewFoundItem, NewLostItem,
    FoundItemSummary, ContactDetails, CategoryCount,
};
pub use error::ItemError;
pub use ports::{ItemPort, MemoryItemPort};
pub use registry::{ItemRegistry, TRENDING_LIMIT, TRENDING_WINDOW_DAYS};
