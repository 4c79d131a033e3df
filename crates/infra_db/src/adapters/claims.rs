//! PostgreSQL Claim Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    ClaimId, DomainPort, FoundItemId, HealthCheckResult, HealthCheckable, LostItemId, PortError,
    UserId,
};
use domain_claims::{Claim, ClaimPort, ClaimStatus};
use uuid::Uuid;

use crate::repositories::claims::{ClaimRow, ClaimsRepository};

/// PostgreSQL-backed implementation of the ClaimPort trait
///
/// Duplicate pending claims are rejected by the partial unique index
/// `uq_claims_pending_per_claimant` and surface as `PortError::Conflict`.
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-claim-adapter").await
    }
}

#[async_trait]
impl ClaimPort for PostgresClaimAdapter {
    #[instrument(skip(self), fields(claim_id = %id))]
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        debug!("Fetching claim");
        let row = self
            .repository
            .get_by_id(id.into())
            .await
            .map_err(|e| e.into_port_error("Claim", id))?;
        claim_from_row(row)
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id, found_item_id = %claim.found_item_id))]
    async fn insert_pending(&self, claim: &Claim) -> Result<(), PortError> {
        self.repository
            .insert_pending(&claim_to_row(claim))
            .await
            .map_err(|e| e.into_port_error("Claim", claim.id))
    }

    #[instrument(skip(self), fields(claim_id = %id))]
    async fn try_transition(
        &self,
        id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    ) -> Result<Option<Claim>, PortError> {
        let updated = self
            .repository
            .try_transition(id.into(), from.as_str(), to.as_str())
            .await
            .map_err(|e| e.into_port_error("Claim", id))?;
        debug!(%from, %to, swapped = updated.is_some(), "Conditional status update");
        updated.map(claim_from_row).transpose()
    }

    async fn claims_by_claimant(&self, claimant: UserId) -> Result<Vec<Claim>, PortError> {
        self.repository
            .find_by_claimant(claimant.into())
            .await
            .map_err(|e| e.into_port_error("User", claimant))?
            .into_iter()
            .map(claim_from_row)
            .collect()
    }

    async fn claims_for_found_items(&self, ids: &[FoundItemId]) -> Result<Vec<Claim>, PortError> {
        let ids: Vec<Uuid> = ids.iter().map(|id| Uuid::from(*id)).collect();
        self.repository
            .find_by_found_items(&ids)
            .await
            .map_err(|e| e.into_port_error("FoundItem", "*"))?
            .into_iter()
            .map(claim_from_row)
            .collect()
    }
}

pub(crate) fn claim_from_row(row: ClaimRow) -> Result<Claim, PortError> {
    let status: ClaimStatus = row
        .status
        .parse()
        .map_err(|e: domain_claims::ClaimError| PortError::internal(e.to_string()))?;

    Ok(Claim {
        id: ClaimId::from_uuid(row.claim_id),
        found_item_id: FoundItemId::from_uuid(row.found_item_id),
        lost_item_id: row.lost_item_id.map(LostItemId::from_uuid),
        claimant_id: UserId::from_uuid(row.claimant_id),
        answer: row.answer,
        status,
        created_at: row.created_at,
        resolved_at: row.resolved_at,
    })
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: claim.id.into(),
        found_item_id: claim.found_item_id.into(),
        lost_item_id: claim.lost_item_id.map(Uuid::from),
        claimant_id: claim.claimant_id.into(),
        answer: claim.answer.clone(),
        status: claim.status.as_str().to_string(),
        created_at: claim.created_at,
        resolved_at: claim.resolved_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(status: &str) -> ClaimRow {
        ClaimRow {
            claim_id: Uuid::new_v4(),
            found_item_id: Uuid::new_v4(),
            lost_item_id: None,
            claimant_id: Uuid::new_v4(),
            answer: "It has a dent near the hinge".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[test]
    fn test_row_status_parsed() {
        let claim = claim_from_row(row("accepted")).unwrap();
        assert_eq!(claim.status, ClaimStatus::Accepted);
        assert_eq!(claim_to_row(&claim).status, "accepted");
    }

    #[test]
    fn test_unknown_status_is_internal_error() {
        let err = claim_from_row(row("approved")).unwrap_err();
        assert!(matches!(err, PortError::Internal { .. }));
    }
}
