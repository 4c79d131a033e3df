//! Pre-built Test Fixtures
//!
//! Consistent, predictable data for unit tests.

use chrono::{DateTime, TimeZone, Utc};

use core_kernel::UserId;
use domain_items::{FoundItemReport, LostItemReport, NewFoundItem, NewLostItem};

/// Fixed timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// When the umbrella went missing (June 1, 2024, 08:00 UTC)
    pub fn time_lost() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    /// When the finder picked it up, half an hour later
    pub fn time_found() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }
}

/// Fixed strings
pub struct StringFixtures;

impl StringFixtures {
    pub fn item_name() -> &'static str {
        "Blue umbrella"
    }

    pub fn category() -> &'static str {
        "accessories"
    }

    pub fn security_question() -> &'static str {
        "What is engraved on the handle?"
    }

    pub fn answer() -> &'static str {
        "A small anchor"
    }

    pub fn finder_email() -> &'static str {
        "finder@example.com"
    }

    pub fn owner_email() -> &'static str {
        "owner@example.com"
    }

    pub fn phone() -> &'static str {
        "555-0100"
    }
}

/// Ready-made reports and requests
pub struct ItemFixtures;

impl ItemFixtures {
    /// A valid found item request
    pub fn new_found_item() -> NewFoundItem {
        NewFoundItem {
            name: StringFixtures::item_name().to_string(),
            category: StringFixtures::category().to_string(),
            description: "Compact, wooden handle".to_string(),
            location_found: "Platform 4".to_string(),
            time_found: TemporalFixtures::time_found(),
            contact_email: StringFixtures::finder_email().to_string(),
            contact_phone: StringFixtures::phone().to_string(),
            security_question: StringFixtures::security_question().to_string(),
        }
    }

    /// A valid lost item request
    pub fn new_lost_item() -> NewLostItem {
        NewLostItem {
            name: StringFixtures::item_name().to_string(),
            category: StringFixtures::category().to_string(),
            description: "Lost on the morning train".to_string(),
            location_lost: "Central station".to_string(),
            time_lost: TemporalFixtures::time_lost(),
            contact_email: StringFixtures::owner_email().to_string(),
            contact_phone: StringFixtures::phone().to_string(),
            reward: None,
        }
    }

    /// An unclaimed found item report filed by `reporter`
    pub fn found_item_report(reporter: UserId) -> FoundItemReport {
        FoundItemReport::new(reporter, Self::new_found_item())
    }

    /// An unclaimed lost item report filed by `reporter`
    pub fn lost_item_report(reporter: UserId) -> LostItemReport {
        LostItemReport::new(reporter, Self::new_lost_item())
    }
}
