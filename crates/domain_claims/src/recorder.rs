//! Return recorder

use std::sync::Arc;

use tracing::{info, instrument};

use core_kernel::{ClaimId, FoundItemId, LostItemId};

use crate::error::ClaimError;
use crate::ports::ReturnPort;
use crate::returns::SuccessfulReturn;

/// Component owning the append-only log of successful returns
#[derive(Clone)]
pub struct ReturnRecorder {
    returns: Arc<dyn ReturnPort>,
}

impl ReturnRecorder {
    pub fn new(returns: Arc<dyn ReturnPort>) -> Self {
        Self { returns }
    }

    pub fn port(&self) -> &Arc<dyn ReturnPort> {
        &self.returns
    }

    /// Appends a return record for an accepted claim
    ///
    /// Only called once both compare-and-swap steps of an acceptance have
    /// succeeded.
    #[instrument(skip(self), fields(claim_id = %claim_id, found_item_id = %found_item_id))]
    pub async fn record_return(
        &self,
        claim_id: ClaimId,
        found_item_id: FoundItemId,
        lost_item_id: Option<LostItemId>,
    ) -> Result<SuccessfulReturn, ClaimError> {
        let record = SuccessfulReturn::new(claim_id, found_item_id, lost_item_id);
        self.returns.insert_return(&record).await?;
        info!(return_id = %record.id, "Successful return recorded");
        Ok(record)
    }

    pub async fn returns_for_found_item(&self, id: FoundItemId) -> Result<Vec<SuccessfulReturn>, ClaimError> {
        Ok(self.returns.returns_for_found_item(id).await?)
    }

    /// Return records involving any of the given reports
    pub async fn returns_involving(
        &self,
        found_ids: &[FoundItemId],
        lost_ids: &[LostItemId],
    ) -> Result<Vec<SuccessfulReturn>, ClaimError> {
        if found_ids.is_empty() && lost_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.returns.returns_involving(found_ids, lost_ids).await?)
    }
}
