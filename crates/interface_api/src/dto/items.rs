//! Item DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;

use domain_items::{NewFoundItem, NewLostItem};

#[derive(Debug, Deserialize)]
pub struct ReportFoundItemRequest {
    pub name: String,
    pub category: String,
    pub description: String,
    pub location_found: String,
    pub time_found: DateTime<Utc>,
    pub contact_email: String,
    pub contact_phone: String,
    pub security_question: String,
}

impl From<ReportFoundItemRequest> for NewFoundItem {
    fn from(request: ReportFoundItemRequest) -> Self {
        NewFoundItem {
            name: request.name,
            category: request.category,
            description: request.description,
            location_found: request.location_found,
            time_found: request.time_found,
            contact_email: request.contact_email,
            contact_phone: request.contact_phone,
            security_question: request.security_question,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportLostItemRequest {
    pub name: String,
    pub category: String,
    pub description: String,
    pub location_lost: String,
    pub time_lost: DateTime<Utc>,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde(default)]
    pub reward: Option<String>,
}

impl From<ReportLostItemRequest> for NewLostItem {
    fn from(request: ReportLostItemRequest) -> Self {
        NewLostItem {
            name: request.name,
            category: request.category,
            description: request.description,
            location_lost: request.location_lost,
            time_lost: request.time_lost,
            contact_email: request.contact_email,
            contact_phone: request.contact_phone,
            reward: request.reward,
        }
    }
}

/// Owner's manual correction of a lost report
#[derive(Debug, Deserialize)]
pub struct UpdateLostItemStatusRequest {
    pub claimed: bool,
}
