//! Item domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the item domain
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Found item not found: {0}")]
    FoundItemNotFound(String),

    #[error("Lost item not found: {0}")]
    LostItemNotFound(String),

    /// The actor is not the reporter of the item they tried to change
    #[error("Not authorized to update this item")]
    NotReporter,

    #[error("Invalid report: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

impl ItemError {
    /// Returns true if a referenced report is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ItemError::FoundItemNotFound(_) | ItemError::LostItemNotFound(_)
        )
    }
}
