//! Successful return records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, FoundItemId, LostItemId, ReturnId};

/// Permanent record of a completed lost-found reconciliation
///
/// Written once when a claim is accepted and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessfulReturn {
    pub id: ReturnId,
    /// Accepted claim that produced this record
    pub claim_id: ClaimId,
    pub found_item_id: FoundItemId,
    pub lost_item_id: Option<LostItemId>,
    pub return_date: DateTime<Utc>,
}

impl SuccessfulReturn {
    /// Creates a return record dated now
    pub fn new(
        claim_id: ClaimId,
        found_item_id: FoundItemId,
        lost_item_id: Option<LostItemId>,
    ) -> Self {
        Self {
            id: ReturnId::new_v7(),
            claim_id,
            found_item_id,
            lost_item_id,
            return_date: Utc::now(),
        }
    }
}
