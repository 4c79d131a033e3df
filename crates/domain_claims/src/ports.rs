//! Claims Domain Ports
//!
//! Storage ports for claims and return records, plus the optional
//! [`AcceptancePort`] for stores that can run an acceptance as one
//! transaction.
//!
//! # Atomicity requirements
//!
//! - [`ClaimPort::insert_pending`] must reject a second pending claim by the
//!   same claimant on the same item atomically with the insert.
//! - [`ClaimPort::try_transition`] is a compare-and-swap on the status.
//! - [`ReturnPort::insert_return`] must refuse a second record for the same
//!   found item.
//!
//! Nothing here requires a lock spanning two calls. The coordinator composes
//! these primitives and rolls back the item reservation when the second
//! compare-and-swap fails.

use async_trait::async_trait;

use core_kernel::{ClaimId, FoundItemId, LostItemId, UserId, PortError, DomainPort, HealthCheckable};

use crate::claim::{Claim, ClaimStatus};
use crate::returns::SuccessfulReturn;

/// Storage port for claims
#[async_trait]
pub trait ClaimPort: DomainPort + HealthCheckable {
    /// Retrieves a claim, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Inserts a pending claim
    ///
    /// Returns `PortError::Conflict` if the claimant already holds a pending
    /// claim on the same found item.
    async fn insert_pending(&self, claim: &Claim) -> Result<(), PortError>;

    /// Moves a claim from `from` to `to` if its status still equals `from`
    ///
    /// Returns the updated claim, or `None` when the stored status differed.
    async fn try_transition(
        &self,
        id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    ) -> Result<Option<Claim>, PortError>;

    /// Claims submitted by a user, newest first
    async fn claims_by_claimant(&self, claimant: UserId) -> Result<Vec<Claim>, PortError>;

    /// Claims made against any of the given found items, newest first
    async fn claims_for_found_items(&self, ids: &[FoundItemId]) -> Result<Vec<Claim>, PortError>;
}

/// Storage port for successful return records
#[async_trait]
pub trait ReturnPort: DomainPort + HealthCheckable {
    /// Appends a return record
    ///
    /// Returns `PortError::Conflict` if one already exists for the found item.
    async fn insert_return(&self, record: &SuccessfulReturn) -> Result<(), PortError>;

    /// Return records referencing a found item (zero or one)
    async fn returns_for_found_item(&self, id: FoundItemId) -> Result<Vec<SuccessfulReturn>, PortError>;

    /// Return records referencing any of the given found or lost items
    async fn returns_involving(
        &self,
        found_ids: &[FoundItemId],
        lost_ids: &[LostItemId],
    ) -> Result<Vec<SuccessfulReturn>, PortError>;
}

/// Result of a transactional acceptance
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptanceOutcome {
    /// Item reserved, claim accepted, return recorded; the accepted claim
    Accepted(Claim),
    /// The item was already claimed; nothing was written
    ItemAlreadyClaimed,
    /// The claim stopped being pending; the reservation was rolled back
    ClaimNoLongerPending,
}

/// Optional port for stores with multi-row transactions
///
/// Implementations perform, in one transaction: the `claimed` flag
/// compare-and-swap, the pending-to-accepted compare-and-swap, the insert of
/// `record`, and the flag on `record.lost_item_id` when present.
#[async_trait]
pub trait AcceptancePort: DomainPort {
    async fn accept_atomically(&self, record: &SuccessfulReturn) -> Result<AcceptanceOutcome, PortError>;
}

pub use memory::{MemoryClaimPort, MemoryReturnPort};

/// In-memory claim and return stores
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use chrono::Utc;
    use tokio::sync::RwLock;

    fn newest_first(mut claims: Vec<Claim>) -> Vec<Claim> {
        claims.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        claims
    }

    /// In-memory claim store
    #[derive(Debug, Default, Clone)]
    pub struct MemoryClaimPort {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    }

    impl MemoryClaimPort {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl DomainPort for MemoryClaimPort {}

    #[async_trait]
    impl HealthCheckable for MemoryClaimPort {
        async fn health_check(&self) -> core_kernel::HealthCheckResult {
            core_kernel::HealthCheckResult::healthy("memory-claim-port", 0)
        }
    }

    #[async_trait]
    impl ClaimPort for MemoryClaimPort {
        async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
            self.claims
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn insert_pending(&self, claim: &Claim) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let duplicate = claims.values().any(|c| {
                c.found_item_id == claim.found_item_id
                    && c.claimant_id == claim.claimant_id
                    && c.is_pending()
            });
            if duplicate {
                return Err(PortError::conflict("duplicate pending claim"));
            }
            claims.insert(claim.id, claim.clone());
            Ok(())
        }

        async fn try_transition(
            &self,
            id: ClaimId,
            from: ClaimStatus,
            to: ClaimStatus,
        ) -> Result<Option<Claim>, PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Claim", id))?;

            if claim.status != from {
                return Ok(None);
            }
            claim.status = to;
            claim.resolved_at = Some(Utc::now());
            Ok(Some(claim.clone()))
        }

        async fn claims_by_claimant(&self, claimant: UserId) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            Ok(newest_first(
                claims.values().filter(|c| c.claimant_id == claimant).cloned().collect(),
            ))
        }

        async fn claims_for_found_items(&self, ids: &[FoundItemId]) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            Ok(newest_first(
                claims.values().filter(|c| ids.contains(&c.found_item_id)).cloned().collect(),
            ))
        }
    }

    /// In-memory return store
    #[derive(Debug, Default, Clone)]
    pub struct MemoryReturnPort {
        returns: Arc<RwLock<Vec<SuccessfulReturn>>>,
    }

    impl MemoryReturnPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of records stored, across all items
        pub async fn len(&self) -> usize {
            self.returns.read().await.len()
        }
    }

    impl DomainPort for MemoryReturnPort {}

    #[async_trait]
    impl HealthCheckable for MemoryReturnPort {
        async fn health_check(&self) -> core_kernel::HealthCheckResult {
            core_kernel::HealthCheckResult::healthy("memory-return-port", 0)
        }
    }

    #[async_trait]
    impl ReturnPort for MemoryReturnPort {
        async fn insert_return(&self, record: &SuccessfulReturn) -> Result<(), PortError> {
            let mut returns = self.returns.write().await;
            if returns.iter().any(|r| r.found_item_id == record.found_item_id) {
                return Err(PortError::conflict(format!(
                    "return already recorded for {}",
                    record.found_item_id
                )));
            }
            returns.push(record.clone());
            Ok(())
        }

        async fn returns_for_found_item(&self, id: FoundItemId) -> Result<Vec<SuccessfulReturn>, PortError> {
            let returns = self.returns.read().await;
            Ok(returns.iter().filter(|r| r.found_item_id == id).cloned().collect())
        }

        async fn returns_involving(
            &self,
            found_ids: &[FoundItemId],
            lost_ids: &[LostItemId],
        ) -> Result<Vec<SuccessfulReturn>, PortError> {
            let returns = self.returns.read().await;
            Ok(returns
                .iter()
                .filter(|r| {
                    found_ids.contains(&r.found_item_id)
                        || r.lost_item_id.map_or(false, |id| lost_ids.contains(&id))
                })
                .cloned()
                .collect())
        }
    }
}
