//! Claims DTOs

use serde::Deserialize;

use core_kernel::{FoundItemId, LostItemId};
use domain_claims::{ClaimDecision, NewClaim};

#[derive(Debug, Deserialize)]
pub struct SubmitClaimRequest {
    pub found_item_id: FoundItemId,
    #[serde(default)]
    pub lost_item_id: Option<LostItemId>,
    pub answer: String,
}

impl From<SubmitClaimRequest> for NewClaim {
    fn from(request: SubmitClaimRequest) -> Self {
        NewClaim {
            found_item_id: request.found_item_id,
            lost_item_id: request.lost_item_id,
            answer: request.answer,
        }
    }
}

/// The finder's decision, `{"decision": "accept"}` or `{"decision": "reject"}`
#[derive(Debug, Deserialize)]
pub struct RespondToClaimRequest {
    pub decision: ClaimDecision,
}
