//! Unit tests for the Identifiers module
//!
//! Tests cover creation, parsing, conversion, and display formatting of the
//! identifier types used by reports, claims and returns.

use core_kernel::{FoundItemId, LostItemId, ClaimId, ReturnId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

mod found_item_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = FoundItemId::new();
        let id2 = FoundItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = FoundItemId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = FoundItemId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(FoundItemId::prefix(), "FIT");
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = FoundItemId::new();
        let parsed: FoundItemId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: FoundItemId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("FIT-not-a-uuid".parse::<FoundItemId>().is_err());
    }

    #[test]
    fn test_json_is_bare_uuid() {
        let id = FoundItemId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod prefix_tests {
    use super::*;

    #[test]
    fn test_all_prefixes_are_distinct() {
        let prefixes = [
            FoundItemId::prefix(),
            LostItemId::prefix(),
            ClaimId::prefix(),
            ReturnId::prefix(),
            UserId::prefix(),
        ];
        let mut sorted = prefixes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), prefixes.len());
    }

    #[test]
    fn test_display_uses_prefix() {
        assert!(LostItemId::new().to_string().starts_with("LIT-"));
        assert!(ClaimId::new().to_string().starts_with("CLM-"));
        assert!(ReturnId::new().to_string().starts_with("RET-"));
        assert!(UserId::new().to_string().starts_with("USR-"));
    }
}

proptest! {
    #[test]
    fn prop_claim_id_display_parses_back(bytes in any::<[u8; 16]>()) {
        let id = ClaimId::from_uuid(Uuid::from_bytes(bytes));
        let parsed: ClaimId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }
}
