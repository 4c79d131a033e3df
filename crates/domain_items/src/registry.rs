//! Item registry
//!
//! The registry is the single owner of the `claimed` flag on found items.
//! Report filing, read accessors and the owner's manual status correction
//! for lost items go through it as well.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use core_kernel::{FoundItemId, LostItemId, UserId, PortError};

use crate::error::ItemError;
use crate::ports::ItemPort;
use crate::report::{CategoryCount, FoundItemReport, LostItemReport, NewFoundItem, NewLostItem};

/// How far back trending categories look
pub const TRENDING_WINDOW_DAYS: i64 = 7;

/// How many trending categories are reported
pub const TRENDING_LIMIT: usize = 5;

/// Component owning found and lost item reports
#[derive(Clone)]
pub struct ItemRegistry {
    port: Arc<dyn ItemPort>,
}

impl ItemRegistry {
    /// Creates a registry over the given storage port
    pub fn new(port: Arc<dyn ItemPort>) -> Self {
        Self { port }
    }

    /// Returns the underlying port, e.g. for health checks
    pub fn port(&self) -> &Arc<dyn ItemPort> {
        &self.port
    }

    /// Files a found item report on behalf of `reporter`
    #[instrument(skip(self, request), fields(reporter = %reporter))]
    pub async fn report_found_item(
        &self,
        reporter: UserId,
        request: NewFoundItem,
    ) -> Result<FoundItemReport, ItemError> {
        request
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        let report = FoundItemReport::new(reporter, request);
        self.port.insert_found_item(&report).await?;
        info!(found_item_id = %report.id, "Found item reported");
        Ok(report)
    }

    /// Files a lost item report on behalf of `reporter`
    #[instrument(skip(self, request), fields(reporter = %reporter))]
    pub async fn report_lost_item(
        &self,
        reporter: UserId,
        request: NewLostItem,
    ) -> Result<LostItemReport, ItemError> {
        request
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        let report = LostItemReport::new(reporter, request);
        self.port.insert_lost_item(&report).await?;
        info!(lost_item_id = %report.id, "Lost item reported");
        Ok(report)
    }

    /// Retrieves a found item report
    pub async fn get_found_item(&self, id: FoundItemId) -> Result<FoundItemReport, ItemError> {
        self.port
            .get_found_item(id)
            .await
            .map_err(|e| found_not_found(e, id))
    }

    /// Retrieves a lost item report
    pub async fn get_lost_item(&self, id: LostItemId) -> Result<LostItemReport, ItemError> {
        self.port
            .get_lost_item(id)
            .await
            .map_err(|e| lost_not_found(e, id))
    }

    /// Compare-and-swap on the found item's `claimed` flag
    ///
    /// Returns `true` if the flag held `expected_claimed` and was flipped.
    /// `try_mark_claimed(id, true)` releases a reservation.
    #[instrument(skip(self), fields(found_item_id = %id))]
    pub async fn try_mark_claimed(
        &self,
        id: FoundItemId,
        expected_claimed: bool,
    ) -> Result<bool, ItemError> {
        let swapped = self
            .port
            .try_mark_claimed(id, expected_claimed)
            .await
            .map_err(|e| found_not_found(e, id))?;

        debug!(expected_claimed, swapped, "Claimed flag compare-and-swap");
        Ok(swapped)
    }

    /// Best-effort flag on the lost report referenced by an accepted claim
    pub async fn mark_lost_item_claimed(&self, id: LostItemId) -> Result<(), ItemError> {
        self.port
            .mark_lost_item_claimed(id)
            .await
            .map_err(|e| lost_not_found(e, id))
    }

    /// Manual status correction of a lost item by its own reporter
    #[instrument(skip(self), fields(lost_item_id = %id, actor = %actor))]
    pub async fn update_lost_item_status(
        &self,
        actor: UserId,
        id: LostItemId,
        claimed: bool,
    ) -> Result<LostItemReport, ItemError> {
        let report = self.get_lost_item(id).await?;
        if !report.is_reported_by(actor) {
            warn!("Lost item status update by non-reporter refused");
            return Err(ItemError::NotReporter);
        }

        let updated = self
            .port
            .set_lost_item_claimed(id, claimed)
            .await
            .map_err(|e| lost_not_found(e, id))?;
        info!(claimed, "Lost item status updated by reporter");
        Ok(updated)
    }

    /// Found items filed by `reporter`
    pub async fn found_items_by_reporter(&self, reporter: UserId) -> Result<Vec<FoundItemReport>, ItemError> {
        Ok(self.port.found_items_by_reporter(reporter).await?)
    }

    /// Lost items filed by `reporter`
    pub async fn lost_items_by_reporter(&self, reporter: UserId) -> Result<Vec<LostItemReport>, ItemError> {
        Ok(self.port.lost_items_by_reporter(reporter).await?)
    }

    /// Found items still open for claims
    pub async fn available_found_items(&self) -> Result<Vec<FoundItemReport>, ItemError> {
        Ok(self.port.available_found_items().await?)
    }

    /// Lost items not yet marked as recovered
    pub async fn available_lost_items(&self) -> Result<Vec<LostItemReport>, ItemError> {
        Ok(self.port.available_lost_items().await?)
    }

    /// Most reported categories over the week before `now`
    pub async fn trending_categories(&self, now: DateTime<Utc>) -> Result<Vec<CategoryCount>, ItemError> {
        let since = now - Duration::days(TRENDING_WINDOW_DAYS);
        Ok(self.port.trending_categories(since, TRENDING_LIMIT).await?)
    }
}

fn found_not_found(error: PortError, id: FoundItemId) -> ItemError {
    if error.is_not_found() {
        ItemError::FoundItemNotFound(id.to_string())
    } else {
        ItemError::Storage(error)
    }
}

fn lost_not_found(error: PortError, id: LostItemId) -> ItemError {
    if error.is_not_found() {
        ItemError::LostItemNotFound(id.to_string())
    } else {
        ItemError::Storage(error)
    }
}
