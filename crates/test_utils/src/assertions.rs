//! Custom Test Assertions
//!
//! Assertion helpers for claim outcomes that print the offending value
//! instead of a bare `assert!(false)`.

use std::fmt::Debug;

use core_kernel::ClaimId;
use domain_claims::{Claim, ClaimError, ClaimStatus, ConflictReason, SuccessfulReturn};

/// Asserts that `result` failed with a conflict for the given reason
pub fn assert_conflict<T: Debug>(result: &Result<T, ClaimError>, expected: ConflictReason) {
    match result {
        Err(ClaimError::Conflict(reason)) => assert_eq!(
            *reason, expected,
            "Expected conflict '{}', got conflict '{}'",
            expected, reason
        ),
        other => panic!("Expected conflict '{}', got {:?}", expected, other),
    }
}

/// Asserts that `result` failed because the actor lacked permission
pub fn assert_forbidden<T: Debug>(result: &Result<T, ClaimError>) {
    assert!(
        matches!(result, Err(ClaimError::Forbidden(_))),
        "Expected forbidden, got {:?}",
        result
    );
}

/// Asserts that `result` failed because something did not exist
pub fn assert_not_found<T: Debug>(result: &Result<T, ClaimError>) {
    assert!(
        matches!(result, Err(ClaimError::NotFound { .. })),
        "Expected not found, got {:?}",
        result
    );
}

/// Asserts a claim's status
pub fn assert_claim_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status, expected,
        "Claim {} has status {}, expected {}",
        claim.id, claim.status, expected
    );
    assert_eq!(
        claim.resolved_at.is_some(),
        expected != ClaimStatus::Pending,
        "Claim {} resolution timestamp does not match status {}",
        claim.id,
        claim.status
    );
}

/// Asserts that exactly one return exists and that it belongs to `claim_id`
pub fn assert_single_return(returns: &[SuccessfulReturn], claim_id: ClaimId) {
    assert_eq!(
        returns.len(),
        1,
        "Expected exactly one successful return, got {}: {:?}",
        returns.len(),
        returns
    );
    assert_eq!(
        returns[0].claim_id, claim_id,
        "Return belongs to claim {}, expected {}",
        returns[0].claim_id, claim_id
    );
}
