//! Item Domain Ports
//!
//! This module defines the storage port for found and lost item reports.
//! Adapters implement [`ItemPort`]:
//!
//! - **PostgreSQL Adapter**: `infra_db::adapters::PostgresItemAdapter`
//! - **Memory Adapter**: [`MemoryItemPort`], used by tests and by the server
//!   when no database is configured
//!
//! The only write an adapter must make atomic is
//! [`ItemPort::try_mark_claimed`]: it is the compare-and-swap that decides
//! which of several concurrent accept attempts wins a found item.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{FoundItemId, LostItemId, UserId, PortError, DomainPort, HealthCheckable};

use crate::report::{CategoryCount, FoundItemReport, LostItemReport};

/// Storage port for item reports
#[async_trait]
pub trait ItemPort: DomainPort + HealthCheckable {
    /// Retrieves a found item report, or `PortError::NotFound`
    async fn get_found_item(&self, id: FoundItemId) -> Result<FoundItemReport, PortError>;

    /// Retrieves a lost item report, or `PortError::NotFound`
    async fn get_lost_item(&self, id: LostItemId) -> Result<LostItemReport, PortError>;

    /// Persists a newly filed found item report
    async fn insert_found_item(&self, report: &FoundItemReport) -> Result<(), PortError>;

    /// Persists a newly filed lost item report
    async fn insert_lost_item(&self, report: &LostItemReport) -> Result<(), PortError>;

    /// Conditionally flips the `claimed` flag of a found item
    ///
    /// Sets `claimed = !expected_claimed` only if the stored value equals
    /// `expected_claimed`. Returns `Ok(false)` without side effects when the
    /// stored value differs, and `PortError::NotFound` if the item is absent.
    async fn try_mark_claimed(
        &self,
        id: FoundItemId,
        expected_claimed: bool,
    ) -> Result<bool, PortError>;

    /// Unconditionally marks a lost item as claimed
    async fn mark_lost_item_claimed(&self, id: LostItemId) -> Result<(), PortError>;

    /// Sets the claimed flag of a lost item to the given value
    async fn set_lost_item_claimed(
        &self,
        id: LostItemId,
        claimed: bool,
    ) -> Result<LostItemReport, PortError>;

    /// Found items filed by a user, newest first
    async fn found_items_by_reporter(&self, reporter: UserId) -> Result<Vec<FoundItemReport>, PortError>;

    /// Lost items filed by a user, newest first
    async fn lost_items_by_reporter(&self, reporter: UserId) -> Result<Vec<LostItemReport>, PortError>;

    /// Unclaimed found items, newest first
    async fn available_found_items(&self) -> Result<Vec<FoundItemReport>, PortError>;

    /// Unclaimed lost items, newest first
    async fn available_lost_items(&self) -> Result<Vec<LostItemReport>, PortError>;

    /// Top `limit` categories by combined found and lost reports since `since`
    ///
    /// Found items are dated by `time_found` and lost items by `time_lost`,
    /// claimed or not. Ordered by count descending, then category name.
    async fn trending_categories(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CategoryCount>, PortError>;
}

pub use memory::MemoryItemPort;

/// In-memory implementation of ItemPort
///
/// Each collection sits behind its own lock; every method takes at most one
/// guard, so the compare-and-swap is atomic per call and nothing more.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory item store
    #[derive(Debug, Default, Clone)]
    pub struct MemoryItemPort {
        found: Arc<RwLock<HashMap<FoundItemId, FoundItemReport>>>,
        lost: Arc<RwLock<HashMap<LostItemId, LostItemReport>>>,
    }

    impl MemoryItemPort {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store with found item reports
        pub async fn with_found_items(reports: Vec<FoundItemReport>) -> Self {
            let port = Self::new();
            {
                let mut found = port.found.write().await;
                for report in reports {
                    found.insert(report.id, report);
                }
            }
            port
        }
    }

    fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
    where
        F: Fn(&T) -> DateTime<Utc>,
    {
        items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
        items
    }

    impl DomainPort for MemoryItemPort {}

    #[async_trait]
    impl HealthCheckable for MemoryItemPort {
        async fn health_check(&self) -> core_kernel::HealthCheckResult {
            core_kernel::HealthCheckResult::healthy("memory-item-port", 0)
        }
    }

    #[async_trait]
    impl ItemPort for MemoryItemPort {
        async fn get_found_item(&self, id: FoundItemId) -> Result<FoundItemReport, PortError> {
            self.found
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("FoundItem", id))
        }

        async fn get_lost_item(&self, id: LostItemId) -> Result<LostItemReport, PortError> {
            self.lost
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("LostItem", id))
        }

        async fn insert_found_item(&self, report: &FoundItemReport) -> Result<(), PortError> {
            let mut found = self.found.write().await;
            if found.contains_key(&report.id) {
                return Err(PortError::conflict(format!("found item {} already exists", report.id)));
            }
            found.insert(report.id, report.clone());
            Ok(())
        }

        async fn insert_lost_item(&self, report: &LostItemReport) -> Result<(), PortError> {
            let mut lost = self.lost.write().await;
            if lost.contains_key(&report.id) {
                return Err(PortError::conflict(format!("lost item {} already exists", report.id)));
            }
            lost.insert(report.id, report.clone());
            Ok(())
        }

        async fn try_mark_claimed(
            &self,
            id: FoundItemId,
            expected_claimed: bool,
        ) -> Result<bool, PortError> {
            let mut found = self.found.write().await;
            let report = found
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("FoundItem", id))?;

            if report.claimed != expected_claimed {
                return Ok(false);
            }
            report.claimed = !expected_claimed;
            Ok(true)
        }

        async fn mark_lost_item_claimed(&self, id: LostItemId) -> Result<(), PortError> {
            self.set_lost_item_claimed(id, true).await.map(|_| ())
        }

        async fn set_lost_item_claimed(
            &self,
            id: LostItemId,
            claimed: bool,
        ) -> Result<LostItemReport, PortError> {
            let mut lost = self.lost.write().await;
            let report = lost
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("LostItem", id))?;
            report.claimed = claimed;
            Ok(report.clone())
        }

        async fn found_items_by_reporter(&self, reporter: UserId) -> Result<Vec<FoundItemReport>, PortError> {
            let found = self.found.read().await;
            let items = found.values().filter(|r| r.reporter_id == reporter).cloned().collect();
            Ok(newest_first(items, |r: &FoundItemReport| r.created_at))
        }

        async fn lost_items_by_reporter(&self, reporter: UserId) -> Result<Vec<LostItemReport>, PortError> {
            let lost = self.lost.read().await;
            let items = lost.values().filter(|r| r.reporter_id == reporter).cloned().collect();
            Ok(newest_first(items, |r: &LostItemReport| r.created_at))
        }

        async fn available_found_items(&self) -> Result<Vec<FoundItemReport>, PortError> {
            let found = self.found.read().await;
            let items = found.values().filter(|r| !r.claimed).cloned().collect();
            Ok(newest_first(items, |r: &FoundItemReport| r.created_at))
        }

        async fn available_lost_items(&self) -> Result<Vec<LostItemReport>, PortError> {
            let lost = self.lost.read().await;
            let items = lost.values().filter(|r| !r.claimed).cloned().collect();
            Ok(newest_first(items, |r: &LostItemReport| r.created_at))
        }

        async fn trending_categories(
            &self,
            since: DateTime<Utc>,
            limit: usize,
        ) -> Result<Vec<CategoryCount>, PortError> {
            let mut counts: HashMap<String, u64> = HashMap::new();
            {
                let found = self.found.read().await;
                for report in found.values().filter(|r| r.time_found >= since) {
                    *counts.entry(report.category.clone()).or_default() += 1;
                }
            }
            {
                let lost = self.lost.read().await;
                for report in lost.values().filter(|r| r.time_lost >= since) {
                    *counts.entry(report.category.clone()).or_default() += 1;
                }
            }

            let mut trending: Vec<CategoryCount> = counts
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect();
            trending.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
            trending.truncate(limit);
            Ok(trending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NewFoundItem;
    use chrono::Utc;

    fn report(reporter: UserId) -> FoundItemReport {
        FoundItemReport::new(
            reporter,
            NewFoundItem {
                name: "Keys".to_string(),
                category: "Keys".to_string(),
                description: "Three keys on a red ring".to_string(),
                location_found: "Parking lot B".to_string(),
                time_found: Utc::now(),
                contact_email: "finder@example.com".to_string(),
                contact_phone: "555-0100".to_string(),
                security_question: "What is on the keychain?".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_try_mark_claimed_is_compare_and_swap() {
        let item = report(UserId::new());
        let port = MemoryItemPort::with_found_items(vec![item.clone()]).await;

        assert!(port.try_mark_claimed(item.id, false).await.unwrap());
        assert!(!port.try_mark_claimed(item.id, false).await.unwrap());
        assert!(port.get_found_item(item.id).await.unwrap().claimed);

        // expected=true flips it back, which is how a reservation is released
        assert!(port.try_mark_claimed(item.id, true).await.unwrap());
        assert!(!port.get_found_item(item.id).await.unwrap().claimed);
    }

    #[tokio::test]
    async fn test_try_mark_claimed_missing_item() {
        let port = MemoryItemPort::new();
        let err = port.try_mark_claimed(FoundItemId::new(), false).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_available_found_items_excludes_claimed() {
        let reporter = UserId::new();
        let open = report(reporter);
        let taken = report(reporter);
        let port = MemoryItemPort::with_found_items(vec![open.clone(), taken.clone()]).await;
        port.try_mark_claimed(taken.id, false).await.unwrap();

        let available = port.available_found_items().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, open.id);
        assert_eq!(port.found_items_by_reporter(reporter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let item = report(UserId::new());
        let port = MemoryItemPort::new();
        port.insert_found_item(&item).await.unwrap();
        assert!(port.insert_found_item(&item).await.unwrap_err().is_conflict());
    }
}
