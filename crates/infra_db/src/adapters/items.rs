//! PostgreSQL Item Adapter
//!
//! Implements `ItemPort` over the `found_items` and `lost_items` tables via
//! the [`ItemsRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    DomainPort, FoundItemId, HealthCheckResult, HealthCheckable, LostItemId, PortError, UserId,
};
use domain_items::{CategoryCount, ContactDetails, FoundItemReport, ItemPort, LostItemReport};

use crate::repositories::items::{FoundItemRow, ItemsRepository, LostItemRow};

/// PostgreSQL-backed implementation of the ItemPort trait
#[derive(Debug, Clone)]
pub struct PostgresItemAdapter {
    repository: ItemsRepository,
    pool: PgPool,
}

impl PostgresItemAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ItemsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ItemsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresItemAdapter {}

#[async_trait]
impl HealthCheckable for PostgresItemAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-item-adapter").await
    }
}

#[async_trait]
impl ItemPort for PostgresItemAdapter {
    #[instrument(skip(self), fields(found_item_id = %id))]
    async fn get_found_item(&self, id: FoundItemId) -> Result<FoundItemReport, PortError> {
        debug!("Fetching found item");
        self.repository
            .get_found(id.into())
            .await
            .map(found_from_row)
            .map_err(|e| e.into_port_error("FoundItem", id))
    }

    #[instrument(skip(self), fields(lost_item_id = %id))]
    async fn get_lost_item(&self, id: LostItemId) -> Result<LostItemReport, PortError> {
        debug!("Fetching lost item");
        self.repository
            .get_lost(id.into())
            .await
            .map(lost_from_row)
            .map_err(|e| e.into_port_error("LostItem", id))
    }

    #[instrument(skip(self, report), fields(found_item_id = %report.id))]
    async fn insert_found_item(&self, report: &FoundItemReport) -> Result<(), PortError> {
        self.repository
            .insert_found(&found_to_row(report))
            .await
            .map_err(|e| e.into_port_error("FoundItem", report.id))
    }

    #[instrument(skip(self, report), fields(lost_item_id = %report.id))]
    async fn insert_lost_item(&self, report: &LostItemReport) -> Result<(), PortError> {
        self.repository
            .insert_lost(&lost_to_row(report))
            .await
            .map_err(|e| e.into_port_error("LostItem", report.id))
    }

    #[instrument(skip(self), fields(found_item_id = %id))]
    async fn try_mark_claimed(&self, id: FoundItemId, expected_claimed: bool) -> Result<bool, PortError> {
        let swapped = self
            .repository
            .try_mark_claimed(id.into(), expected_claimed)
            .await
            .map_err(|e| e.into_port_error("FoundItem", id))?;
        debug!(expected_claimed, swapped, "Conditional update of is_claimed");
        Ok(swapped)
    }

    #[instrument(skip(self), fields(lost_item_id = %id))]
    async fn mark_lost_item_claimed(&self, id: LostItemId) -> Result<(), PortError> {
        self.repository
            .mark_lost_claimed(id.into())
            .await
            .map_err(|e| e.into_port_error("LostItem", id))
    }

    #[instrument(skip(self), fields(lost_item_id = %id))]
    async fn set_lost_item_claimed(&self, id: LostItemId, claimed: bool) -> Result<LostItemReport, PortError> {
        self.repository
            .set_lost_claimed(id.into(), claimed)
            .await
            .map(lost_from_row)
            .map_err(|e| e.into_port_error("LostItem", id))
    }

    async fn found_items_by_reporter(&self, reporter: UserId) -> Result<Vec<FoundItemReport>, PortError> {
        let rows = self
            .repository
            .found_by_reporter(reporter.into())
            .await
            .map_err(|e| e.into_port_error("User", reporter))?;
        Ok(rows.into_iter().map(found_from_row).collect())
    }

    async fn lost_items_by_reporter(&self, reporter: UserId) -> Result<Vec<LostItemReport>, PortError> {
        let rows = self
            .repository
            .lost_by_reporter(reporter.into())
            .await
            .map_err(|e| e.into_port_error("User", reporter))?;
        Ok(rows.into_iter().map(lost_from_row).collect())
    }

    async fn available_found_items(&self) -> Result<Vec<FoundItemReport>, PortError> {
        let rows = self
            .repository
            .available_found()
            .await
            .map_err(|e| e.into_port_error("FoundItem", "*"))?;
        Ok(rows.into_iter().map(found_from_row).collect())
    }

    async fn available_lost_items(&self) -> Result<Vec<LostItemReport>, PortError> {
        let rows = self
            .repository
            .available_lost()
            .await
            .map_err(|e| e.into_port_error("LostItem", "*"))?;
        Ok(rows.into_iter().map(lost_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn trending_categories(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CategoryCount>, PortError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .repository
            .trending_categories(since, limit)
            .await
            .map_err(|e| e.into_port_error("Category", "*"))?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryCount {
                category: row.category,
                count: u64::try_from(row.count).unwrap_or_default(),
            })
            .collect())
    }
}

// ============================================================================
// Row conversions
// ============================================================================

fn found_from_row(row: FoundItemRow) -> FoundItemReport {
    FoundItemReport {
        id: FoundItemId::from_uuid(row.found_item_id),
        reporter_id: UserId::from_uuid(row.reporter_id),
        name: row.name,
        category: row.category,
        description: row.description,
        location_found: row.location_found,
        time_found: row.time_found,
        contact: ContactDetails {
            email: row.contact_email,
            phone: row.contact_phone,
        },
        security_question: row.security_question,
        claimed: row.is_claimed,
        created_at: row.created_at,
    }
}

fn found_to_row(report: &FoundItemReport) -> FoundItemRow {
    FoundItemRow {
        found_item_id: report.id.into(),
        reporter_id: report.reporter_id.into(),
        name: report.name.clone(),
        category: report.category.clone(),
        description: report.description.clone(),
        location_found: report.location_found.clone(),
        time_found: report.time_found,
        contact_email: report.contact.email.clone(),
        contact_phone: report.contact.phone.clone(),
        security_question: report.security_question.clone(),
        is_claimed: report.claimed,
        created_at: report.created_at,
    }
}

fn lost_from_row(row: LostItemRow) -> LostItemReport {
    LostItemReport {
        id: LostItemId::from_uuid(row.lost_item_id),
        reporter_id: UserId::from_uuid(row.reporter_id),
        name: row.name,
        category: row.category,
        description: row.description,
        location_lost: row.location_lost,
        time_lost: row.time_lost,
        contact: ContactDetails {
            email: row.contact_email,
            phone: row.contact_phone,
        },
        reward: row.reward,
        claimed: row.is_claimed,
        created_at: row.created_at,
    }
}

fn lost_to_row(report: &LostItemReport) -> LostItemRow {
    LostItemRow {
        lost_item_id: report.id.into(),
        reporter_id: report.reporter_id.into(),
        name: report.name.clone(),
        category: report.category.clone(),
        description: report.description.clone(),
        location_lost: report.location_lost.clone(),
        time_lost: report.time_lost,
        contact_email: report.contact.email.clone(),
        contact_phone: report.contact.phone.clone(),
        reward: report.reward.clone(),
        is_claimed: report.claimed,
        created_at: report.created_at,
    }
}
