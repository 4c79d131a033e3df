//! PostgreSQL integration tests
//!
//! Need Docker. Run with `cargo test -p test_utils -- --ignored`.

use std::sync::Arc;

use chrono::{Duration, Utc};

use core_kernel::UserId;
use domain_claims::{ClaimDecision, ClaimStatus, ConflictReason, ResolutionCoordinator};
use test_utils::{
    assert_claim_status, assert_conflict, assert_forbidden, assert_single_return,
    create_isolated_test_database, NewClaimBuilder, NewFoundItemBuilder, NewLostItemBuilder,
};

async fn found_item(coordinator: &ResolutionCoordinator, finder: UserId) -> core_kernel::FoundItemId {
    coordinator
        .report_found_item(finder, NewFoundItemBuilder::new().build())
        .await
        .unwrap()
        .id
}

async fn accept_flow(transactional: bool) {
    let db = create_isolated_test_database().await.unwrap();
    let coordinator = db.coordinator(transactional);

    let finder = UserId::new();
    let owner = UserId::new();
    let item_id = found_item(&coordinator, finder).await;
    let lost = coordinator
        .report_lost_item(owner, NewLostItemBuilder::new().build())
        .await
        .unwrap();

    let claim = coordinator
        .submit_claim(owner, NewClaimBuilder::on(item_id).for_lost_item(lost.id).build())
        .await
        .unwrap();
    let rival = coordinator
        .submit_claim(UserId::new(), NewClaimBuilder::on(item_id).build())
        .await
        .unwrap();

    let accepted = coordinator
        .respond_to_claim(claim.id, finder, ClaimDecision::Accept)
        .await
        .unwrap();
    assert_claim_status(&accepted, ClaimStatus::Accepted);

    let second = coordinator
        .respond_to_claim(rival.id, finder, ClaimDecision::Accept)
        .await;
    assert_conflict(&second, ConflictReason::ItemAlreadyClaimed);

    let returns = coordinator.recorder().returns_for_found_item(item_id).await.unwrap();
    assert_single_return(&returns, claim.id);

    assert!(coordinator.get_item(item_id).await.unwrap().claimed);
    assert!(coordinator.get_lost_item(lost.id).await.unwrap().claimed);

    let rival_now = coordinator.ledger().get_claim(rival.id).await.unwrap();
    assert_claim_status(&rival_now, ClaimStatus::Pending);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_sequential_accept_against_postgres() {
    accept_flow(false).await;
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_transactional_accept_against_postgres() {
    accept_flow(true).await;
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_pending_claim_hits_unique_index() {
    let db = create_isolated_test_database().await.unwrap();
    let coordinator = db.coordinator(true);
    let item_id = found_item(&coordinator, UserId::new()).await;
    let claimant = UserId::new();

    coordinator
        .submit_claim(claimant, NewClaimBuilder::on(item_id).build())
        .await
        .unwrap();
    let duplicate = coordinator
        .submit_claim(claimant, NewClaimBuilder::on(item_id).build())
        .await;

    assert_conflict(&duplicate, ConflictReason::DuplicatePendingClaim);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_self_claim_forbidden_against_postgres() {
    let db = create_isolated_test_database().await.unwrap();
    let coordinator = db.coordinator(false);
    let finder = UserId::new();
    let item_id = found_item(&coordinator, finder).await;

    let result = coordinator
        .submit_claim(finder, NewClaimBuilder::on(item_id).build())
        .await;
    assert_forbidden(&result);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires docker"]
async fn test_concurrent_accepts_produce_one_return() {
    for transactional in [false, true] {
        let db = create_isolated_test_database().await.unwrap();
        let coordinator = Arc::new(db.coordinator(transactional));
        let finder = UserId::new();
        let item_id = found_item(&coordinator, finder).await;

        let mut claim_ids = Vec::new();
        for _ in 0..8 {
            let claim = coordinator
                .submit_claim(UserId::new(), NewClaimBuilder::on(item_id).build())
                .await
                .unwrap();
            claim_ids.push(claim.id);
        }

        let handles: Vec<_> = claim_ids
            .iter()
            .map(|&claim_id| {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move {
                    coordinator
                        .respond_to_claim(claim_id, finder, ClaimDecision::Accept)
                        .await
                })
            })
            .collect();

        let mut winners = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(claim) => winners.push(claim.id),
                Err(e) => assert!(e.is_conflict(), "unexpected error: {e}"),
            }
        }

        assert_eq!(winners.len(), 1, "transactional={transactional}");
        let returns = coordinator.recorder().returns_for_found_item(item_id).await.unwrap();
        assert_single_return(&returns, winners[0]);
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_clear_data_empties_tables() {
    let db = create_isolated_test_database().await.unwrap();
    let coordinator = db.coordinator(false);
    found_item(&coordinator, UserId::new()).await;

    db.clear_data().await.unwrap();

    assert!(coordinator.available_found_items().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_trending_categories_group_by_category() {
    let db = create_isolated_test_database().await.unwrap();
    let coordinator = db.coordinator(false);
    let reporter = UserId::new();
    let yesterday = Utc::now() - Duration::days(1);

    for category in ["keys", "bags", "keys"] {
        let request = NewFoundItemBuilder::new()
            .with_category(category)
            .with_time_found(yesterday)
            .build();
        coordinator.report_found_item(reporter, request).await.unwrap();
    }
    // fixture date is in 2024, outside the window
    coordinator
        .report_lost_item(reporter, NewLostItemBuilder::new().build())
        .await
        .unwrap();

    let trending = coordinator.trending_categories().await.unwrap();
    let pairs: Vec<(&str, u64)> = trending.iter().map(|c| (c.category.as_str(), c.count)).collect();
    assert_eq!(pairs, vec![("keys", 2), ("bags", 1)]);
}
