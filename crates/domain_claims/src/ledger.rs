//! Claim ledger
//!
//! Owns claim records and their status state machine. Creation enforces the
//! submission preconditions; every later status change is a compare-and-swap
//! through [`ClaimLedger::try_transition`].

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use validator::Validate;

use core_kernel::{ClaimId, FoundItemId, UserId};
use domain_items::ItemRegistry;

use crate::claim::{Claim, ClaimStatus, NewClaim};
use crate::error::{ClaimError, ConflictReason};
use crate::ports::ClaimPort;

/// Component owning claims
#[derive(Clone)]
pub struct ClaimLedger {
    claims: Arc<dyn ClaimPort>,
    items: ItemRegistry,
}

impl ClaimLedger {
    pub fn new(claims: Arc<dyn ClaimPort>, items: ItemRegistry) -> Self {
        Self { claims, items }
    }

    /// Returns the underlying port, e.g. for health checks
    pub fn port(&self) -> &Arc<dyn ClaimPort> {
        &self.claims
    }

    /// Creates a pending claim
    ///
    /// Checks, in order: a non-empty answer, that the found item exists, that
    /// the claimant is not its reporter, that it is unclaimed, that a
    /// referenced lost report exists, and finally (atomically with the
    /// insert) that the claimant holds no other pending claim on it.
    #[instrument(skip(self, request), fields(found_item_id = %request.found_item_id, claimant = %claimant))]
    pub async fn create_claim(&self, claimant: UserId, request: NewClaim) -> Result<Claim, ClaimError> {
        request
            .validate()
            .map_err(|e| ClaimError::Validation(e.to_string()))?;

        let item = match self.items.get_found_item(request.found_item_id).await {
            Ok(item) => item,
            Err(e) if e.is_not_found() => {
                debug!("Claim refused: found item does not exist");
                return Err(ClaimError::Conflict(ConflictReason::ItemNotAvailable));
            }
            Err(e) => return Err(e.into()),
        };

        if item.is_reported_by(claimant) {
            warn!("Claim refused: claimant reported the item");
            return Err(ClaimError::forbidden("cannot claim own item"));
        }

        if item.claimed {
            debug!("Claim refused: item already claimed");
            return Err(ClaimError::Conflict(ConflictReason::ItemNotAvailable));
        }

        if let Some(lost_item_id) = request.lost_item_id {
            self.items.get_lost_item(lost_item_id).await?;
        }

        let claim = Claim::pending(claimant, request);
        match self.claims.insert_pending(&claim).await {
            Ok(()) => {}
            Err(e) if e.is_conflict() => {
                info!("Claim refused: duplicate pending claim");
                return Err(ClaimError::Conflict(ConflictReason::DuplicatePendingClaim));
            }
            Err(e) => return Err(e.into()),
        }

        info!(claim_id = %claim.id, "Claim submitted");
        Ok(claim)
    }

    /// Retrieves a claim
    pub async fn get_claim(&self, id: ClaimId) -> Result<Claim, ClaimError> {
        self.claims.get_claim(id).await.map_err(|e| {
            if e.is_not_found() {
                ClaimError::not_found("Claim", id)
            } else {
                e.into()
            }
        })
    }

    /// Compare-and-swap on the claim status
    ///
    /// Returns the updated claim, or `None` when the status was no longer
    /// `from`. Transitions outside the state machine are refused up front.
    #[instrument(skip(self), fields(claim_id = %id))]
    pub async fn try_transition(
        &self,
        id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    ) -> Result<Option<Claim>, ClaimError> {
        if !from.can_transition_to(to) {
            return Err(ClaimError::InvalidStatusTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let updated = self.claims.try_transition(id, from, to).await?;
        debug!(%from, %to, swapped = updated.is_some(), "Claim status compare-and-swap");
        Ok(updated)
    }

    /// Claims submitted by `claimant`, newest first
    pub async fn claims_by_claimant(&self, claimant: UserId) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.claims.claims_by_claimant(claimant).await?)
    }

    /// Claims made against any of `ids`, newest first
    pub async fn claims_for_found_items(&self, ids: &[FoundItemId]) -> Result<Vec<Claim>, ClaimError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.claims.claims_for_found_items(ids).await?)
    }
}
