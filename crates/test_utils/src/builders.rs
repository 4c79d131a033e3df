//! Test Data Builders
//!
//! Builders for requests with sensible defaults, plus [`TestDesk`], a
//! coordinator wired to in-memory ports that tests can inspect directly.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;

use core_kernel::{FoundItemId, LostItemId, UserId};
use domain_claims::{
    AcceptancePort, MemoryClaimPort, MemoryReturnPort, NewClaim, ResolutionCoordinator,
};
use domain_items::{FoundItemReport, ItemRegistry, LostItemReport, MemoryItemPort, NewFoundItem, NewLostItem};

use crate::fixtures::{StringFixtures, TemporalFixtures};

/// Builder for found item requests
///
/// Contact details and the description are randomised with `fake`.
pub struct NewFoundItemBuilder {
    request: NewFoundItem,
}

impl Default for NewFoundItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewFoundItemBuilder {
    pub fn new() -> Self {
        Self {
            request: NewFoundItem {
                name: StringFixtures::item_name().to_string(),
                category: StringFixtures::category().to_string(),
                description: Sentence(3..8).fake(),
                location_found: "Platform 4".to_string(),
                time_found: TemporalFixtures::time_found(),
                contact_email: SafeEmail().fake(),
                contact_phone: PhoneNumber().fake(),
                security_question: StringFixtures::security_question().to_string(),
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.request.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.request.category = category.into();
        self
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.request.contact_email = email.into();
        self
    }

    pub fn with_security_question(mut self, question: impl Into<String>) -> Self {
        self.request.security_question = question.into();
        self
    }

    pub fn with_time_found(mut self, time_found: DateTime<Utc>) -> Self {
        self.request.time_found = time_found;
        self
    }

    pub fn build(self) -> NewFoundItem {
        self.request
    }
}

/// Builder for lost item requests
pub struct NewLostItemBuilder {
    request: NewLostItem,
}

impl Default for NewLostItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewLostItemBuilder {
    pub fn new() -> Self {
        Self {
            request: NewLostItem {
                name: StringFixtures::item_name().to_string(),
                category: StringFixtures::category().to_string(),
                description: Sentence(3..8).fake(),
                location_lost: "Central station".to_string(),
                time_lost: TemporalFixtures::time_lost(),
                contact_email: SafeEmail().fake(),
                contact_phone: PhoneNumber().fake(),
                reward: None,
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.request.name = name.into();
        self
    }

    pub fn with_reward(mut self, reward: impl Into<String>) -> Self {
        self.request.reward = Some(reward.into());
        self
    }

    pub fn build(self) -> NewLostItem {
        self.request
    }
}

/// Builder for claim requests
pub struct NewClaimBuilder {
    request: NewClaim,
}

impl NewClaimBuilder {
    /// Starts a claim on `found_item_id` with the fixture answer
    pub fn on(found_item_id: FoundItemId) -> Self {
        Self {
            request: NewClaim {
                found_item_id,
                lost_item_id: None,
                answer: StringFixtures::answer().to_string(),
            },
        }
    }

    pub fn for_lost_item(mut self, lost_item_id: LostItemId) -> Self {
        self.request.lost_item_id = Some(lost_item_id);
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.request.answer = answer.into();
        self
    }

    pub fn build(self) -> NewClaim {
        self.request
    }
}

/// A coordinator over in-memory ports, with handles kept for inspection
#[derive(Clone)]
pub struct TestDesk {
    pub coordinator: ResolutionCoordinator,
    pub items: Arc<MemoryItemPort>,
    pub claims: Arc<MemoryClaimPort>,
    pub returns: Arc<MemoryReturnPort>,
}

impl Default for TestDesk {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDesk {
    pub fn new() -> Self {
        let items = Arc::new(MemoryItemPort::new());
        let claims = Arc::new(MemoryClaimPort::new());
        let returns = Arc::new(MemoryReturnPort::new());
        let coordinator = ResolutionCoordinator::new(
            ItemRegistry::new(items.clone()),
            claims.clone(),
            returns.clone(),
        );

        Self {
            coordinator,
            items,
            claims,
            returns,
        }
    }

    /// Routes acceptance through `port` instead of the sequential path
    pub fn with_acceptance(mut self, port: Arc<dyn AcceptancePort>) -> Self {
        self.coordinator = self.coordinator.with_transactional_acceptance(port);
        self
    }

    /// Files a found item for `finder` and returns the stored report
    pub async fn found_item(&self, finder: UserId) -> FoundItemReport {
        self.coordinator
            .report_found_item(finder, NewFoundItemBuilder::new().build())
            .await
            .expect("fixture found item is valid")
    }

    /// Files a lost item for `owner` and returns the stored report
    pub async fn lost_item(&self, owner: UserId) -> LostItemReport {
        self.coordinator
            .report_lost_item(owner, NewLostItemBuilder::new().build())
            .await
            .expect("fixture lost item is valid")
    }

    pub async fn return_count(&self) -> usize {
        self.returns.len().await
    }
}
