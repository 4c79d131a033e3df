//! Claims domain errors

use std::fmt;

use core_kernel::PortError;
use domain_items::ItemError;
use thiserror::Error;

/// Why a claim operation conflicted with current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The found item is missing or already claimed at submission time
    ItemNotAvailable,
    /// The claimant already has a pending claim on the item
    DuplicatePendingClaim,
    /// The claim was already accepted or rejected
    AlreadyResolved,
    /// Another claim won the item first
    ItemAlreadyClaimed,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ConflictReason::ItemNotAvailable => "item not available",
            ConflictReason::DuplicatePendingClaim => "duplicate pending claim",
            ConflictReason::AlreadyResolved => "already resolved",
            ConflictReason::ItemAlreadyClaimed => "item already claimed",
        };
        f.write_str(message)
    }
}

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Expected under contention; the human may retry
    #[error("Conflict: {0}")]
    Conflict(ConflictReason),

    #[error("Invalid claim: {0}")]
    Validation(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// A reserved item could not be paired with its claim; operators must look
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl ClaimError {
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        ClaimError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ClaimError::Forbidden(message.into())
    }

    /// Returns the conflict reason, if this is a conflict
    pub fn conflict_reason(&self) -> Option<ConflictReason> {
        match self {
            ClaimError::Conflict(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClaimError::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClaimError::NotFound { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ClaimError::Forbidden(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ClaimError::Internal(_))
    }
}

impl From<ItemError> for ClaimError {
    fn from(error: ItemError) -> Self {
        match error {
            ItemError::FoundItemNotFound(id) => ClaimError::NotFound { entity: "FoundItem", id },
            ItemError::LostItemNotFound(id) => ClaimError::NotFound { entity: "LostItem", id },
            ItemError::NotReporter => ClaimError::Forbidden("only the item reporter may do this".to_string()),
            ItemError::Validation(message) => ClaimError::Validation(message),
            ItemError::Storage(e) => ClaimError::Storage(e),
        }
    }
}
