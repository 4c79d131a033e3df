//! Claims Resolution Domain
//!
//! This crate implements the lifecycle of a claim on a found item, from
//! submission through the finder's decision to the successful return record.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Pending -> Accepted  (item claimed, SuccessfulReturn written)
//!         -> Rejected  (item stays open, claimant may resubmit)
//! ```
//!
//! Accepted and rejected claims never change again. At most one claim per
//! found item is ever accepted, even under concurrent responses.

pub mod claim;
pub mod returns;
pub mod error;
pub mod ports;
pub mod ledger;
pub mod recorder;
pub mod coordinator;
pub mod view;

pub use claim::{Claim, ClaimStatus, ClaimDecision, NewClaim};
pub use returns::SuccessfulReturn;
pub use error::{ClaimError, ConflictReason};
pub use ports::{
    ClaimPort, ReturnPort, AcceptancePort, AcceptanceOutcome,
    MemoryClaimPort, MemoryReturnPort,
};
pub use ledger::ClaimLedger;
pub use recorder::ReturnRecorder;
pub use coordinator::ResolutionCoordinator;
pub use view::{ClaimView, UserClaims, UserItems};
