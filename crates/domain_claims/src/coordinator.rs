//! Resolution coordinator
//!
//! The only component that mutates state across the registry, the ledger and
//! the recorder. Acceptance is the critical path:
//!
//! 1. reserve the found item (`claimed: false -> true`)
//! 2. move the claim `pending -> accepted`
//! 3. append the successful return
//! 4. flag the referenced lost report, best effort
//!
//! Steps 1 and 2 are each a compare-and-swap, so of many concurrent accepts
//! on the same item exactly one reserves it and the others see a conflict.
//! When an [`AcceptancePort`] is configured, steps 1 to 4 run in a single
//! storage transaction instead.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use core_kernel::{ClaimId, FoundItemId, LostItemId, UserId, HealthCheckResult, HealthCheckable};
use domain_items::{
    CategoryCount, FoundItemReport, FoundItemSummary, ItemRegistry, LostItemReport, NewFoundItem, NewLostItem,
};

use crate::claim::{Claim, ClaimDecision, ClaimStatus, NewClaim};
use crate::error::{ClaimError, ConflictReason};
use crate::ledger::ClaimLedger;
use crate::ports::{AcceptanceOutcome, AcceptancePort, ClaimPort, ReturnPort};
use crate::recorder::ReturnRecorder;
use crate::returns::SuccessfulReturn;
use crate::view::{ClaimView, UserClaims, UserItems};

/// Orchestrates claim submission and resolution
#[derive(Clone)]
pub struct ResolutionCoordinator {
    items: ItemRegistry,
    ledger: ClaimLedger,
    recorder: ReturnRecorder,
    acceptance: Option<Arc<dyn AcceptancePort>>,
}

impl ResolutionCoordinator {
    /// Creates a coordinator using the sequential compare-and-swap path
    pub fn new(items: ItemRegistry, claims: Arc<dyn ClaimPort>, returns: Arc<dyn ReturnPort>) -> Self {
        Self {
            ledger: ClaimLedger::new(claims, items.clone()),
            recorder: ReturnRecorder::new(returns),
            items,
            acceptance: None,
        }
    }

    /// Routes acceptances through a transactional port
    pub fn with_transactional_acceptance(mut self, port: Arc<dyn AcceptancePort>) -> Self {
        self.acceptance = Some(port);
        self
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn ledger(&self) -> &ClaimLedger {
        &self.ledger
    }

    pub fn recorder(&self) -> &ReturnRecorder {
        &self.recorder
    }

    /// Returns true when acceptances run as one storage transaction
    pub fn is_transactional(&self) -> bool {
        self.acceptance.is_some()
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    pub async fn report_found_item(&self, actor: UserId, request: NewFoundItem) -> Result<FoundItemReport, ClaimError> {
        Ok(self.items.report_found_item(actor, request).await?)
    }

    pub async fn report_lost_item(&self, actor: UserId, request: NewLostItem) -> Result<LostItemReport, ClaimError> {
        Ok(self.items.report_lost_item(actor, request).await?)
    }

    /// Manual correction of a lost report's status by its reporter
    pub async fn update_lost_item_status(
        &self,
        actor: UserId,
        id: LostItemId,
        claimed: bool,
    ) -> Result<LostItemReport, ClaimError> {
        Ok(self.items.update_lost_item_status(actor, id, claimed).await?)
    }

    // ------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------

    /// Submits a claim on behalf of `claimant`
    ///
    /// The availability check here is advisory; the ledger re-checks every
    /// precondition when it creates the claim.
    #[instrument(skip(self, request), fields(found_item_id = %request.found_item_id, claimant = %claimant))]
    pub async fn submit_claim(&self, claimant: UserId, request: NewClaim) -> Result<Claim, ClaimError> {
        let item = self.items.get_found_item(request.found_item_id).await?;
        if item.claimed && !item.is_reported_by(claimant) {
            debug!("Submission refused: item already claimed");
            return Err(ClaimError::Conflict(ConflictReason::ItemNotAvailable));
        }

        self.ledger.create_claim(claimant, request).await
    }

    /// Accepts or rejects a pending claim on behalf of the found item's reporter
    #[instrument(skip(self), fields(claim_id = %claim_id, responder = %responder))]
    pub async fn respond_to_claim(
        &self,
        claim_id: ClaimId,
        responder: UserId,
        decision: ClaimDecision,
    ) -> Result<Claim, ClaimError> {
        let claim = self.ledger.get_claim(claim_id).await?;
        let item = self.items.get_found_item(claim.found_item_id).await?;

        if !item.is_reported_by(responder) {
            warn!("Response refused: responder did not report the item");
            return Err(ClaimError::forbidden("only the finder may respond to this claim"));
        }

        if !claim.is_pending() {
            info!(status = %claim.status, "Response refused: claim already resolved");
            return Err(ClaimError::Conflict(ConflictReason::AlreadyResolved));
        }

        match decision {
            ClaimDecision::Reject => self.reject(claim_id).await,
            ClaimDecision::Accept => match &self.acceptance {
                Some(port) => self.accept_transactionally(port.as_ref(), &claim).await,
                None => self.accept(&claim).await,
            },
        }
    }

    async fn reject(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        match self
            .ledger
            .try_transition(claim_id, ClaimStatus::Pending, ClaimStatus::Rejected)
            .await?
        {
            Some(rejected) => {
                info!("Claim rejected");
                Ok(rejected)
            }
            None => {
                info!("Rejection lost the race: claim already resolved");
                Err(ClaimError::Conflict(ConflictReason::AlreadyResolved))
            }
        }
    }

    async fn accept(&self, claim: &Claim) -> Result<Claim, ClaimError> {
        let found_item_id = claim.found_item_id;

        if !self.items.try_mark_claimed(found_item_id, false).await? {
            info!("Acceptance lost the race: item already claimed");
            return Err(ClaimError::Conflict(ConflictReason::ItemAlreadyClaimed));
        }

        let accepted = match self
            .ledger
            .try_transition(claim.id, ClaimStatus::Pending, ClaimStatus::Accepted)
            .await
        {
            Ok(Some(accepted)) => accepted,
            Ok(None) => {
                self.release(found_item_id).await;
                error!("Item reserved but claim was no longer pending; reservation released");
                return Err(ClaimError::Internal(format!(
                    "claim {} changed status after {} was reserved",
                    claim.id, found_item_id
                )));
            }
            Err(e) => {
                self.release(found_item_id).await;
                error!(error = %e, "Item reserved but claim transition failed; reservation released");
                return Err(ClaimError::Internal(format!(
                    "failed to accept claim {}: {}",
                    claim.id, e
                )));
            }
        };

        if let Err(e) = self
            .recorder
            .record_return(accepted.id, found_item_id, accepted.lost_item_id)
            .await
        {
            error!(error = %e, "Claim accepted but return record could not be written");
            return Err(ClaimError::Internal(format!(
                "claim {} accepted without a return record: {}",
                accepted.id, e
            )));
        }

        if let Some(lost_item_id) = accepted.lost_item_id {
            self.flag_lost_item(lost_item_id).await;
        }

        info!("Claim accepted");
        Ok(accepted)
    }

    async fn accept_transactionally(
        &self,
        port: &dyn AcceptancePort,
        claim: &Claim,
    ) -> Result<Claim, ClaimError> {
        let record = SuccessfulReturn::new(claim.id, claim.found_item_id, claim.lost_item_id);

        match port.accept_atomically(&record).await {
            Ok(AcceptanceOutcome::Accepted(accepted)) => {
                info!(return_id = %record.id, "Claim accepted");
                Ok(accepted)
            }
            Ok(AcceptanceOutcome::ItemAlreadyClaimed) => {
                info!("Acceptance lost the race: item already claimed");
                Err(ClaimError::Conflict(ConflictReason::ItemAlreadyClaimed))
            }
            Ok(AcceptanceOutcome::ClaimNoLongerPending) => {
                error!("Item reserved but claim was no longer pending; transaction rolled back");
                Err(ClaimError::Internal(format!(
                    "claim {} changed status during acceptance",
                    claim.id
                )))
            }
            Err(e) if e.is_conflict() => {
                info!(error = %e, "Acceptance conflicted with a concurrent write");
                Err(ClaimError::Conflict(ConflictReason::ItemAlreadyClaimed))
            }
            Err(e) => {
                error!(error = %e, "Transactional acceptance failed");
                Err(e.into())
            }
        }
    }

    async fn release(&self, found_item_id: FoundItemId) {
        match self.items.try_mark_claimed(found_item_id, true).await {
            Ok(true) => debug!("Reservation released"),
            Ok(false) => error!("Reservation release found the item already unclaimed"),
            Err(e) => error!(error = %e, "Reservation release failed; item left claimed"),
        }
    }

    async fn flag_lost_item(&self, lost_item_id: LostItemId) {
        if let Err(e) = self.items.mark_lost_item_claimed(lost_item_id).await {
            warn!(%lost_item_id, error = %e, "Could not flag lost item as claimed");
        }
    }

    // ------------------------------------------------------------------
    // Read projections
    // ------------------------------------------------------------------

    pub async fn get_item(&self, id: FoundItemId) -> Result<FoundItemReport, ClaimError> {
        Ok(self.items.get_found_item(id).await?)
    }

    pub async fn get_lost_item(&self, id: LostItemId) -> Result<LostItemReport, ClaimError> {
        Ok(self.items.get_lost_item(id).await?)
    }

    /// Found item as seen by `viewer`
    ///
    /// Contact details are shown to the reporter and to a claimant whose
    /// claim on the item was accepted.
    pub async fn found_item_view(&self, viewer: UserId, id: FoundItemId) -> Result<FoundItemSummary, ClaimError> {
        let item = self.items.get_found_item(id).await?;
        let reveal = item.is_reported_by(viewer)
            || self
                .ledger
                .claims_by_claimant(viewer)
                .await?
                .iter()
                .any(|c| c.found_item_id == id && c.status == ClaimStatus::Accepted);
        Ok(item.summary(reveal))
    }

    /// Unclaimed found items, without contact details
    pub async fn available_found_items(&self) -> Result<Vec<FoundItemSummary>, ClaimError> {
        let items = self.items.available_found_items().await?;
        Ok(items.iter().map(|item| item.summary(false)).collect())
    }

    pub async fn available_lost_items(&self) -> Result<Vec<LostItemReport>, ClaimError> {
        Ok(self.items.available_lost_items().await?)
    }

    /// Categories reported most often over the past week
    pub async fn trending_categories(&self) -> Result<Vec<CategoryCount>, ClaimError> {
        Ok(self.items.trending_categories(Utc::now()).await?)
    }

    /// Claims `user` submitted and claims received on their found items
    #[instrument(skip(self), fields(user = %user))]
    pub async fn get_claims_for_user(&self, user: UserId) -> Result<UserClaims, ClaimError> {
        let submitted = self.ledger.claims_by_claimant(user).await?;
        let own_items = self.items.found_items_by_reporter(user).await?;
        let own_ids: Vec<FoundItemId> = own_items.iter().map(|item| item.id).collect();
        let received = self.ledger.claims_for_found_items(&own_ids).await?;

        let mut found: HashMap<FoundItemId, FoundItemReport> =
            own_items.into_iter().map(|item| (item.id, item)).collect();
        let mut lost: HashMap<LostItemId, LostItemReport> = HashMap::new();

        for claim in submitted.iter().chain(received.iter()) {
            if !found.contains_key(&claim.found_item_id) {
                if let Some(item) = self.load_optional_found(claim.found_item_id).await? {
                    found.insert(item.id, item);
                }
            }
            if let Some(lost_id) = claim.lost_item_id {
                if !lost.contains_key(&lost_id) {
                    if let Some(item) = self.load_optional_lost(lost_id).await? {
                        lost.insert(item.id, item);
                    }
                }
            }
        }

        let lost_for = |claim: &Claim| claim.lost_item_id.and_then(|id| lost.get(&id).cloned());

        Ok(UserClaims {
            submitted: submitted
                .into_iter()
                .map(|claim| {
                    let lost_item = lost_for(&claim);
                    let found_item = found.get(&claim.found_item_id);
                    ClaimView::for_claimant(claim, found_item, lost_item)
                })
                .collect(),
            received: received
                .into_iter()
                .map(|claim| {
                    let lost_item = lost_for(&claim);
                    let found_item = found.get(&claim.found_item_id);
                    ClaimView::for_finder(claim, found_item, lost_item)
                })
                .collect(),
        })
    }

    /// A single claim as seen by its claimant or by the item's finder
    #[instrument(skip(self), fields(claim_id = %id, viewer = %viewer))]
    pub async fn claim_view(&self, viewer: UserId, id: ClaimId) -> Result<ClaimView, ClaimError> {
        let claim = self.ledger.get_claim(id).await?;
        let found = self.load_optional_found(claim.found_item_id).await?;
        let lost = match claim.lost_item_id {
            Some(lost_id) => self.load_optional_lost(lost_id).await?,
            None => None,
        };

        if claim.claimant_id == viewer {
            Ok(ClaimView::for_claimant(claim, found.as_ref(), lost))
        } else if found.as_ref().map_or(false, |item| item.is_reported_by(viewer)) {
            Ok(ClaimView::for_finder(claim, found.as_ref(), lost))
        } else {
            warn!("Claim view refused: viewer is neither claimant nor finder");
            Err(ClaimError::forbidden("not a party to this claim"))
        }
    }

    /// Reports filed by `user` and the returns involving them
    #[instrument(skip(self), fields(user = %user))]
    pub async fn get_user_items(&self, user: UserId) -> Result<UserItems, ClaimError> {
        let lost_items = self.items.lost_items_by_reporter(user).await?;
        let found_items = self.items.found_items_by_reporter(user).await?;

        let found_ids: Vec<FoundItemId> = found_items.iter().map(|item| item.id).collect();
        let lost_ids: Vec<LostItemId> = lost_items.iter().map(|item| item.id).collect();
        let successful_returns = self.recorder.returns_involving(&found_ids, &lost_ids).await?;

        Ok(UserItems {
            lost_items,
            found_items,
            successful_returns,
        })
    }

    async fn load_optional_found(&self, id: FoundItemId) -> Result<Option<FoundItemReport>, ClaimError> {
        match self.items.get_found_item(id).await {
            Ok(item) => Ok(Some(item)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn load_optional_lost(&self, id: LostItemId) -> Result<Option<LostItemReport>, ClaimError> {
        match self.items.get_lost_item(id).await {
            Ok(item) => Ok(Some(item)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    /// Health of every storage port behind the coordinator
    pub async fn health_check(&self) -> Vec<HealthCheckResult> {
        vec![
            self.items.port().health_check().await,
            self.ledger.port().health_check().await,
            self.recorder.port().health_check().await,
        ]
    }
}
