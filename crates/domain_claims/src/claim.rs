//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ClaimId, FoundItemId, LostItemId, UserId};
use crate::error::ClaimError;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Awaiting the finder's decision
    Pending,
    /// Finder confirmed ownership; terminal
    Accepted,
    /// Finder turned the claim down; terminal
    Rejected,
}

impl ClaimStatus {
    /// Checks if a transition is allowed by the claim state machine
    pub fn can_transition_to(self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!((self, target), (Pending, Accepted) | (Pending, Rejected))
    }

    /// Returns true for statuses that can no longer change
    pub fn is_terminal(self) -> bool {
        !matches!(self, ClaimStatus::Pending)
    }

    /// Lowercase name used in storage and on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Accepted => "accepted",
            ClaimStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClaimStatus::Pending),
            "accepted" => Ok(ClaimStatus::Accepted),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(ClaimError::Validation(format!("unknown claim status '{}'", other))),
        }
    }
}

/// The finder's decision on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimDecision {
    Accept,
    Reject,
}

impl ClaimDecision {
    /// Status a pending claim moves to under this decision
    pub fn target_status(self) -> ClaimStatus {
        match self {
            ClaimDecision::Accept => ClaimStatus::Accepted,
            ClaimDecision::Reject => ClaimStatus::Rejected,
        }
    }
}

/// Request for submitting a claim against a found item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewClaim {
    pub found_item_id: FoundItemId,
    /// Lost report the claimant filed for the same item, if any
    pub lost_item_id: Option<LostItemId>,
    /// Answer to the found item's security question
    #[validate(length(min = 1, message = "An answer to the security question is required"))]
    pub answer: String,
}

/// A claimant's assertion that a found item belongs to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Found item being claimed
    pub found_item_id: FoundItemId,
    /// Optional matching lost report
    pub lost_item_id: Option<LostItemId>,
    /// User asserting ownership
    pub claimant_id: UserId,
    /// Answer to the security question
    pub answer: String,
    /// Status
    pub status: ClaimStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Set when the finder accepts or rejects
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Claim {
    /// Creates a new pending claim
    pub fn pending(claimant_id: UserId, request: NewClaim) -> Self {
        Self {
            id: ClaimId::new_v7(),
            found_item_id: request.found_item_id,
            lost_item_id: request.lost_item_id,
            claimant_id,
            answer: request.answer,
            status: ClaimStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    /// Returns true while the finder has not decided
    pub fn is_pending(&self) -> bool {
        self.status == ClaimStatus::Pending
    }

    /// Applies a status transition, enforcing the state machine
    pub fn resolve(&mut self, status: ClaimStatus) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_claim() -> Claim {
        Claim::pending(
            UserId::new(),
            NewClaim {
                found_item_id: FoundItemId::new(),
                lost_item_id: None,
                answer: "My initials are scratched on the back".to_string(),
            },
        )
    }

    #[test]
    fn test_only_pending_transitions_allowed() {
        use ClaimStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_resolved_claim_is_immutable() {
        let mut claim = pending_claim();
        claim.resolve(ClaimStatus::Rejected).unwrap();
        assert!(claim.resolved_at.is_some());

        let err = claim.resolve(ClaimStatus::Accepted).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidStatusTransition { .. }));
        assert_eq!(claim.status, ClaimStatus::Rejected);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&ClaimStatus::Accepted).unwrap(), "\"accepted\"");
        assert_eq!("rejected".parse::<ClaimStatus>().unwrap(), ClaimStatus::Rejected);
        assert!("approved".parse::<ClaimStatus>().is_err());
        assert_eq!(ClaimDecision::Accept.target_status(), ClaimStatus::Accepted);
    }

    #[test]
    fn test_blank_answer_fails_validation() {
        let request = NewClaim {
            found_item_id: FoundItemId::new(),
            lost_item_id: None,
            answer: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
