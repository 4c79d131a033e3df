//! Repository implementations for the lost and found tables
//!
//! Repositories encapsulate SQL and map rows to plain structs keyed by
//! `Uuid`. Conversion to domain types happens in the adapters.
//!
//! Concurrency control is done in SQL: conditional `UPDATE ... WHERE`
//! statements checked through `rows_affected` or `RETURNING`, and unique
//! indexes for the one-per-item invariants.

pub mod items;
pub mod claims;
pub mod returns;

pub use items::{ItemsRepository, FoundItemRow, LostItemRow, CategoryCountRow};
pub use claims::{ClaimsRepository, ClaimRow, AcceptanceResult};
pub use returns::{ReturnsRepository, ReturnRow};
