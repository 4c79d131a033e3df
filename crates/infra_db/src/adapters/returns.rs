//! PostgreSQL Return Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use core_kernel::{
    ClaimId, DomainPort, FoundItemId, HealthCheckResult, HealthCheckable, LostItemId, PortError,
    ReturnId,
};
use domain_claims::{ReturnPort, SuccessfulReturn};

use crate::repositories::returns::{ReturnRow, ReturnsRepository};

/// PostgreSQL-backed implementation of the ReturnPort trait
#[derive(Debug, Clone)]
pub struct PostgresReturnAdapter {
    repository: ReturnsRepository,
    pool: PgPool,
}

impl PostgresReturnAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReturnsRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresReturnAdapter {}

#[async_trait]
impl HealthCheckable for PostgresReturnAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-return-adapter").await
    }
}

#[async_trait]
impl ReturnPort for PostgresReturnAdapter {
    #[instrument(skip(self, record), fields(return_id = %record.id, found_item_id = %record.found_item_id))]
    async fn insert_return(&self, record: &SuccessfulReturn) -> Result<(), PortError> {
        self.repository
            .insert(&return_to_row(record))
            .await
            .map_err(|e| e.into_port_error("SuccessfulReturn", record.id))
    }

    async fn returns_for_found_item(&self, id: FoundItemId) -> Result<Vec<SuccessfulReturn>, PortError> {
        let rows = self
            .repository
            .find_by_found_item(id.into())
            .await
            .map_err(|e| e.into_port_error("FoundItem", id))?;
        Ok(rows.into_iter().map(return_from_row).collect())
    }

    async fn returns_involving(
        &self,
        found_ids: &[FoundItemId],
        lost_ids: &[LostItemId],
    ) -> Result<Vec<SuccessfulReturn>, PortError> {
        let found: Vec<Uuid> = found_ids.iter().map(|id| Uuid::from(*id)).collect();
        let lost: Vec<Uuid> = lost_ids.iter().map(|id| Uuid::from(*id)).collect();
        let rows = self
            .repository
            .find_involving(&found, &lost)
            .await
            .map_err(|e| e.into_port_error("SuccessfulReturn", "*"))?;
        Ok(rows.into_iter().map(return_from_row).collect())
    }
}

pub(crate) fn return_to_row(record: &SuccessfulReturn) -> ReturnRow {
    ReturnRow {
        return_id: record.id.into(),
        claim_id: record.claim_id.into(),
        found_item_id: record.found_item_id.into(),
        lost_item_id: record.lost_item_id.map(Uuid::from),
        return_date: record.return_date,
    }
}

fn return_from_row(row: ReturnRow) -> SuccessfulReturn {
    SuccessfulReturn {
        id: ReturnId::from_uuid(row.return_id),
        claim_id: ClaimId::from_uuid(row.claim_id),
        found_item_id: FoundItemId::from_uuid(row.found_item_id),
        lost_item_id: row.lost_item_id.map(LostItemId::from_uuid),
        return_date: row.return_date,
    }
}
