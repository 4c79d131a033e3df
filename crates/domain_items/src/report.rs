//! Found and lost item reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{FoundItemId, LostItemId, UserId};

/// Contact details a reporter leaves on a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
}

/// A report describing an item someone found and wants to hand back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItemReport {
    /// Unique identifier
    pub id: FoundItemId,
    /// User who found the item
    pub reporter_id: UserId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location_found: String,
    pub time_found: DateTime<Utc>,
    pub contact: ContactDetails,
    /// Verification prompt claimants must answer
    pub security_question: String,
    /// Set once a claim on this item is accepted
    pub claimed: bool,
    pub created_at: DateTime<Utc>,
}

/// A report describing an item someone lost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LostItemReport {
    /// Unique identifier
    pub id: LostItemId,
    /// User who lost the item
    pub reporter_id: UserId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location_lost: String,
    pub time_lost: DateTime<Utc>,
    pub contact: ContactDetails,
    /// Free-text reward offered by the owner
    pub reward: Option<String>,
    pub claimed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request for filing a found item report
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFoundItem {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location_found: String,
    pub time_found: DateTime<Utc>,
    #[validate(email(message = "Contact email must be a valid address"))]
    pub contact_email: String,
    #[validate(length(min = 1, message = "Contact phone is required"))]
    pub contact_phone: String,
    #[validate(length(min = 1, message = "Security question is required"))]
    pub security_question: String,
}

/// Request for filing a lost item report
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewLostItem {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location_lost: String,
    pub time_lost: DateTime<Utc>,
    #[validate(email(message = "Contact email must be a valid address"))]
    pub contact_email: String,
    #[validate(length(min = 1, message = "Contact phone is required"))]
    pub contact_phone: String,
    pub reward: Option<String>,
}

/// Number of recent found and lost reports filed under one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Read view of a found item for people other than its reporter
///
/// Contact details are only filled in when the viewer is entitled to them,
/// i.e. their claim on the item was accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundItemSummary {
    pub id: FoundItemId,
    pub reporter_id: UserId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location_found: String,
    pub time_found: DateTime<Utc>,
    pub security_question: String,
    pub claimed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactDetails>,
}

impl FoundItemReport {
    /// Creates a new unclaimed report filed by `reporter_id`
    pub fn new(reporter_id: UserId, request: NewFoundItem) -> Self {
        Self {
            id: FoundItemId::new_v7(),
            reporter_id,
            name: request.name,
            category: request.category,
            description: request.description,
            location_found: request.location_found,
            time_found: request.time_found,
            contact: ContactDetails {
                email: request.contact_email,
                phone: request.contact_phone,
            },
            security_question: request.security_question,
            claimed: false,
            created_at: Utc::now(),
        }
    }

    /// Checks whether `user` filed this report
    pub fn is_reported_by(&self, user: UserId) -> bool {
        self.reporter_id == user
    }

    /// Builds the read view, revealing contact details only when asked to
    pub fn summary(&self, reveal_contact: bool) -> FoundItemSummary {
        FoundItemSummary {
            id: self.id,
            reporter_id: self.reporter_id,
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            location_found: self.location_found.clone(),
            time_found: self.time_found,
            security_question: self.security_question.clone(),
            claimed: self.claimed,
            contact: reveal_contact.then(|| self.contact.clone()),
        }
    }
}

impl LostItemReport {
    /// Creates a new unclaimed report filed by `reporter_id`
    pub fn new(reporter_id: UserId, request: NewLostItem) -> Self {
        Self {
            id: LostItemId::new_v7(),
            reporter_id,
            name: request.name,
            category: request.category,
            description: request.description,
            location_lost: request.location_lost,
            time_lost: request.time_lost,
            contact: ContactDetails {
                email: request.contact_email,
                phone: request.contact_phone,
            },
            reward: request.reward.filter(|r| !r.trim().is_empty()),
            claimed: false,
            created_at: Utc::now(),
        }
    }

    /// Checks whether `user` filed this report
    pub fn is_reported_by(&self, user: UserId) -> bool {
        self.reporter_id == user
    }
}
