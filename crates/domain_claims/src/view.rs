//! Read projections returned to users

use serde::Serialize;

use domain_items::{FoundItemReport, FoundItemSummary, LostItemReport};

use crate::claim::{Claim, ClaimStatus};
use crate::returns::SuccessfulReturn;

/// A claim together with the reports it references
#[derive(Debug, Clone, Serialize)]
pub struct ClaimView {
    #[serde(flatten)]
    pub claim: Claim,
    /// Absent if the found item could not be loaded
    pub found_item: Option<FoundItemSummary>,
    pub lost_item: Option<LostItemReport>,
}

impl ClaimView {
    /// View for the claimant: the finder's contact only once accepted
    pub fn for_claimant(claim: Claim, found: Option<&FoundItemReport>, lost: Option<LostItemReport>) -> Self {
        let reveal = claim.status == ClaimStatus::Accepted;
        Self {
            found_item: found.map(|item| item.summary(reveal)),
            lost_item: lost,
            claim,
        }
    }

    /// View for the finder; their own contact details are left out
    pub fn for_finder(claim: Claim, found: Option<&FoundItemReport>, lost: Option<LostItemReport>) -> Self {
        Self {
            found_item: found.map(|item| item.summary(false)),
            lost_item: lost,
            claim,
        }
    }
}

/// Claims a user submitted and claims received on their found items
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserClaims {
    pub submitted: Vec<ClaimView>,
    pub received: Vec<ClaimView>,
}

/// Everything a user has reported, plus the returns involving it
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserItems {
    pub lost_items: Vec<LostItemReport>,
    pub found_items: Vec<FoundItemReport>,
    pub successful_returns: Vec<SuccessfulReturn>,
}
