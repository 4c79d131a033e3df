//! Property-Based Test Generators
//!
//! Proptest strategies for requests that pass validation, plus decision
//! sequences for exercising the claim state machine.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::FoundItemId;
use domain_claims::{ClaimDecision, NewClaim};
use domain_items::{NewFoundItem, NewLostItem};

/// Non-empty printable text
pub fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.'-]{0,40}"
}

/// Simple valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-z]{2,10}", prop_oneof![Just("com"), Just("org"), Just("net")])
        .prop_map(|(user, domain, tld)| format!("{user}@{domain}.{tld}"))
}

pub fn phone_strategy() -> impl Strategy<Value = String> {
    "[0-9]{3}-[0-9]{4}"
}

/// Timestamps during 2024
pub fn timestamp_2024_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..366 * 24 * 60).prop_map(|minutes| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
            + Duration::minutes(minutes)
    })
}

pub fn new_found_item_strategy() -> impl Strategy<Value = NewFoundItem> {
    (
        text_strategy(),
        text_strategy(),
        text_strategy(),
        timestamp_2024_strategy(),
        email_strategy(),
        phone_strategy(),
        text_strategy(),
    )
        .prop_map(|(name, category, location, time_found, email, phone, question)| NewFoundItem {
            description: format!("{name} ({category})"),
            name,
            category,
            location_found: location,
            time_found,
            contact_email: email,
            contact_phone: phone,
            security_question: question,
        })
}

pub fn new_lost_item_strategy() -> impl Strategy<Value = NewLostItem> {
    (
        text_strategy(),
        text_strategy(),
        timestamp_2024_strategy(),
        email_strategy(),
        phone_strategy(),
        proptest::option::of(text_strategy()),
    )
        .prop_map(|(name, location, time_lost, email, phone, reward)| NewLostItem {
            description: format!("Lost near {location}"),
            name,
            category: "misc".to_string(),
            location_lost: location,
            time_lost,
            contact_email: email,
            contact_phone: phone,
            reward,
        })
}

/// A claim on `found_item_id` with an arbitrary non-empty answer
pub fn new_claim_strategy(found_item_id: FoundItemId) -> impl Strategy<Value = NewClaim> {
    text_strategy().prop_map(move |answer| NewClaim {
        found_item_id,
        lost_item_id: None,
        answer,
    })
}

pub fn decision_strategy() -> impl Strategy<Value = ClaimDecision> {
    prop_oneof![Just(ClaimDecision::Accept), Just(ClaimDecision::Reject)]
}

/// Decisions for `1..=max` competing claims, in the order they are answered
pub fn decision_sequence_strategy(max: usize) -> impl Strategy<Value = Vec<ClaimDecision>> {
    proptest::collection::vec(decision_strategy(), 1..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    proptest! {
        #[test]
        fn prop_found_item_requests_validate(request in new_found_item_strategy()) {
            prop_assert!(request.validate().is_ok());
        }

        #[test]
        fn prop_lost_item_requests_validate(request in new_lost_item_strategy()) {
            prop_assert!(request.validate().is_ok());
        }

        #[test]
        fn prop_claim_answers_are_non_empty(claim in new_claim_strategy(FoundItemId::new())) {
            prop_assert!(claim.validate().is_ok());
        }

        #[test]
        fn prop_timestamps_stay_in_2024(ts in timestamp_2024_strategy()) {
            use chrono::Datelike;
            prop_assert_eq!(ts.year(), 2024);
        }
    }
}
