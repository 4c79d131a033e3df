//! PostgreSQL Acceptance Adapter
//!
//! Runs a whole acceptance inside one database transaction, so a crash or a
//! lost race between the item reservation and the claim update can never
//! leave a reserved item without an accepted claim.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, PortError};
use domain_claims::{AcceptanceOutcome, AcceptancePort, SuccessfulReturn};

use crate::adapters::claims::claim_from_row;
use crate::adapters::returns::return_to_row;
use crate::repositories::claims::{AcceptanceResult, ClaimsRepository};

#[derive(Debug, Clone)]
pub struct PostgresAcceptanceAdapter {
    repository: ClaimsRepository,
}

impl PostgresAcceptanceAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool),
        }
    }
}

impl DomainPort for PostgresAcceptanceAdapter {}

#[async_trait]
impl AcceptancePort for PostgresAcceptanceAdapter {
    #[instrument(skip(self, record), fields(claim_id = %record.claim_id, found_item_id = %record.found_item_id))]
    async fn accept_atomically(&self, record: &SuccessfulReturn) -> Result<AcceptanceOutcome, PortError> {
        let result = self
            .repository
            .accept_with_return(&return_to_row(record))
            .await
            .map_err(|e| e.into_port_error("Claim", record.claim_id))?;

        debug!(?result, "Acceptance transaction finished");

        match result {
            AcceptanceResult::Accepted(row) => Ok(AcceptanceOutcome::Accepted(claim_from_row(row)?)),
            AcceptanceResult::ItemAlreadyClaimed => Ok(AcceptanceOutcome::ItemAlreadyClaimed),
            AcceptanceResult::ClaimNoLongerPending => Ok(AcceptanceOutcome::ClaimNoLongerPending),
        }
    }
}
