//! HTTP API tests
//!
//! Runs the full router (auth, audit and handlers) against in-memory storage.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use core_kernel::UserId;
use domain_claims::{MemoryClaimPort, MemoryReturnPort, ResolutionCoordinator};
use domain_items::{ItemRegistry, MemoryItemPort};
use interface_api::{
    auth::create_token,
    config::{ApiConfig, StorageBackend},
    create_router,
};

const SECRET: &str = "api-test-secret";

fn server() -> TestServer {
    let coordinator = ResolutionCoordinator::new(
        ItemRegistry::new(Arc::new(MemoryItemPort::new())),
        Arc::new(MemoryClaimPort::new()),
        Arc::new(MemoryReturnPort::new()),
    );
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        storage: StorageBackend::Memory,
        ..ApiConfig::default()
    };
    TestServer::new(create_router(coordinator, config)).unwrap()
}

fn bearer(user: UserId) -> HeaderValue {
    let token = create_token(user, SECRET, 3600).unwrap();
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

fn found_item_body() -> Value {
    json!({
        "name": "Blue umbrella",
        "category": "accessories",
        "description": "Compact, wooden handle",
        "location_found": "Platform 4",
        "time_found": "2024-06-01T08:30:00Z",
        "contact_email": "finder@example.com",
        "contact_phone": "555-0100",
        "security_question": "What is engraved on the handle?"
    })
}

fn lost_item_body() -> Value {
    json!({
        "name": "Blue umbrella",
        "category": "accessories",
        "description": "Lost on the morning train",
        "location_lost": "Central station",
        "time_lost": "2024-06-01T08:00:00Z",
        "contact_email": "owner@example.com",
        "contact_phone": "555-0199",
        "reward": "Coffee"
    })
}

async fn report_found(server: &TestServer, finder: UserId) -> String {
    let response = server
        .post("/api/v1/items/found")
        .add_header(AUTHORIZATION, bearer(finder))
        .json(&found_item_body())
        .await;
    response.assert_status(StatusCode::CREATED);
    id_of(&response)
}

async fn report_lost(server: &TestServer, owner: UserId) -> String {
    let response = server
        .post("/api/v1/items/lost")
        .add_header(AUTHORIZATION, bearer(owner))
        .json(&lost_item_body())
        .await;
    response.assert_status(StatusCode::CREATED);
    id_of(&response)
}

async fn submit_claim(server: &TestServer, claimant: UserId, found_item_id: &str) -> TestResponse {
    server
        .post("/api/v1/claims")
        .add_header(AUTHORIZATION, bearer(claimant))
        .json(&json!({ "found_item_id": found_item_id, "answer": "My initials" }))
        .await
}

async fn respond(server: &TestServer, finder: UserId, claim_id: &str, decision: &str) -> TestResponse {
    server
        .post(&format!("/api/v1/claims/{claim_id}/respond"))
        .add_header(AUTHORIZATION, bearer(finder))
        .json(&json!({ "decision": decision }))
        .await
}

fn id_of(response: &TestResponse) -> String {
    response.json::<Value>()["id"]
        .as_str()
        .expect("response carries an id")
        .to_string()
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let server = server();
        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_reports_memory_adapters() {
        let server = server();
        let response = server.get("/health/ready").await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["adapters"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let server = server();
        let response = server.get("/api/v1/items/found").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let server = server();
        let token = create_token(UserId::new(), "someone-else", 3600).unwrap();
        let response = server
            .get("/api/v1/claims")
            .add_header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap())
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

mod item_tests {
    use super::*;

    #[tokio::test]
    async fn test_trending_categories_cover_the_past_week() {
        let server = server();
        let reporter = UserId::new();
        let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
        for category in ["electronics", "keys", "electronics"] {
            let mut body = found_item_body();
            body["category"] = json!(category);
            body["time_found"] = json!(yesterday);
            server
                .post("/api/v1/items/found")
                .add_header(AUTHORIZATION, bearer(reporter))
                .json(&body)
                .await
                .assert_status(StatusCode::CREATED);
        }
        // dated 2024, outside the window
        report_found(&server, reporter).await;

        let response = server
            .get("/api/v1/items/stats/trending-categories")
            .add_header(AUTHORIZATION, bearer(UserId::new()))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!([
                { "category": "electronics", "count": 2 },
                { "category": "keys", "count": 1 }
            ])
        );
    }

    #[tokio::test]
    async fn test_browse_hides_contact_details() {
        let server = server();
        let finder = UserId::new();
        report_found(&server, finder).await;

        let response = server
            .get("/api/v1/items/found")
            .add_header(AUTHORIZATION, bearer(UserId::new()))
            .await;
        response.assert_status_ok();

        let items = response.json::<Vec<Value>>();
        assert_eq!(items.len(), 1);
        assert!(items[0].get("contact").is_none());
        assert_eq!(items[0]["security_question"], "What is engraved on the handle?");
    }

    #[tokio::test]
    async fn test_finder_sees_own_contact_details() {
        let server = server();
        let finder = UserId::new();
        let item_id = report_found(&server, finder).await;

        let response = server
            .get(&format!("/api/v1/items/found/{item_id}"))
            .add_header(AUTHORIZATION, bearer(finder))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["contact"]["email"], "finder@example.com");
    }

    #[tokio::test]
    async fn test_invalid_email_is_unprocessable() {
        let server = server();
        let mut body = found_item_body();
        body["contact_email"] = json!("not-an-email");

        let response = server
            .post("/api/v1/items/found")
            .add_header(AUTHORIZATION, bearer(UserId::new()))
            .json(&body)
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_found_item_is_not_found() {
        let server = server();
        let response = server
            .get(&format!("/api/v1/items/found/{}", uuid::Uuid::new_v4()))
            .add_header(AUTHORIZATION, bearer(UserId::new()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_only_owner_updates_lost_item_status() {
        let server = server();
        let owner = UserId::new();
        let lost_id = report_lost(&server, owner).await;
        let path = format!("/api/v1/items/lost/{lost_id}/status");

        server
            .put(&path)
            .add_header(AUTHORIZATION, bearer(UserId::new()))
            .json(&json!({ "claimed": true }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let response = server
            .put(&path)
            .add_header(AUTHORIZATION, bearer(owner))
            .json(&json!({ "claimed": true }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["claimed"], true);

        let open = server
            .get("/api/v1/items/lost")
            .add_header(AUTHORIZATION, bearer(owner))
            .await
            .json::<Vec<Value>>();
        assert!(open.is_empty());
    }
}

mod claim_tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_own_item_is_forbidden() {
        let server = server();
        let finder = UserId::new();
        let item_id = report_found(&server, finder).await;

        let response = submit_claim(&server, finder, &item_id).await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_duplicate_pending_claim_conflicts() {
        let server = server();
        let item_id = report_found(&server, UserId::new()).await;
        let claimant = UserId::new();

        submit_claim(&server, claimant, &item_id)
            .await
            .assert_status(StatusCode::CREATED);
        submit_claim(&server, claimant, &item_id)
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_accept_then_second_accept_conflicts() {
        let server = server();
        let finder = UserId::new();
        let item_id = report_found(&server, finder).await;

        let first = submit_claim(&server, UserId::new(), &item_id).await;
        first.assert_status(StatusCode::CREATED);
        let second = submit_claim(&server, UserId::new(), &item_id).await;
        second.assert_status(StatusCode::CREATED);

        let accepted = respond(&server, finder, &id_of(&first), "accept").await;
        accepted.assert_status_ok();
        assert_eq!(accepted.json::<Value>()["status"], "accepted");

        let conflict = respond(&server, finder, &id_of(&second), "accept").await;
        conflict.assert_status(StatusCode::CONFLICT);
        assert_eq!(conflict.json::<Value>()["error"], "conflict");

        // The item is gone from the browse list once claimed
        let available = server
            .get("/api/v1/items/found")
            .add_header(AUTHORIZATION, bearer(finder))
            .await
            .json::<Vec<Value>>();
        assert!(available.is_empty());
    }

    #[tokio::test]
    async fn test_only_finder_may_respond() {
        let server = server();
        let item_id = report_found(&server, UserId::new()).await;
        let claimant = UserId::new();
        let claim = submit_claim(&server, claimant, &item_id).await;

        let response = respond(&server, claimant, &id_of(&claim), "accept").await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rejected_claim_cannot_be_accepted() {
        let server = server();
        let finder = UserId::new();
        let item_id = report_found(&server, finder).await;
        let claim = submit_claim(&server, UserId::new(), &item_id).await;
        let claim_id = id_of(&claim);

        respond(&server, finder, &claim_id, "reject").await.assert_status_ok();
        respond(&server, finder, &claim_id, "accept")
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_accepted_claimant_sees_finder_contact() {
        let server = server();
        let finder = UserId::new();
        let claimant = UserId::new();
        let item_id = report_found(&server, finder).await;
        let claim_id = id_of(&submit_claim(&server, claimant, &item_id).await);

        let before = server
            .get(&format!("/api/v1/claims/{claim_id}"))
            .add_header(AUTHORIZATION, bearer(claimant))
            .await
            .json::<Value>();
        assert!(before["found_item"].get("contact").is_none());

        respond(&server, finder, &claim_id, "accept").await.assert_status_ok();

        let after = server
            .get(&format!("/api/v1/claims/{claim_id}"))
            .add_header(AUTHORIZATION, bearer(claimant))
            .await
            .json::<Value>();
        assert_eq!(after["status"], "accepted");
        assert_eq!(after["found_item"]["contact"]["phone"], "555-0100");
    }

    #[tokio::test]
    async fn test_outsider_cannot_view_claim() {
        let server = server();
        let item_id = report_found(&server, UserId::new()).await;
        let claim_id = id_of(&submit_claim(&server, UserId::new(), &item_id).await);

        server
            .get(&format!("/api/v1/claims/{claim_id}"))
            .add_header(AUTHORIZATION, bearer(UserId::new()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_claims_splits_submitted_and_received() {
        let server = server();
        let finder = UserId::new();
        let claimant = UserId::new();
        let item_id = report_found(&server, finder).await;
        submit_claim(&server, claimant, &item_id).await;

        let finder_view = server
            .get("/api/v1/claims")
            .add_header(AUTHORIZATION, bearer(finder))
            .await
            .json::<Value>();
        assert_eq!(finder_view["submitted"].as_array().map(Vec::len), Some(0));
        assert_eq!(finder_view["received"].as_array().map(Vec::len), Some(1));

        let claimant_view = server
            .get("/api/v1/claims")
            .add_header(AUTHORIZATION, bearer(claimant))
            .await
            .json::<Value>();
        assert_eq!(claimant_view["submitted"].as_array().map(Vec::len), Some(1));
        assert_eq!(claimant_view["received"].as_array().map(Vec::len), Some(0));
    }
}

mod user_tests {
    use super::*;

    #[tokio::test]
    async fn test_user_items_include_return_for_linked_lost_item() {
        let server = server();
        let finder = UserId::new();
        let owner = UserId::new();
        let found_id = report_found(&server, finder).await;
        let lost_id = report_lost(&server, owner).await;

        let claim = server
            .post("/api/v1/claims")
            .add_header(AUTHORIZATION, bearer(owner))
            .json(&json!({
                "found_item_id": found_id,
                "lost_item_id": lost_id,
                "answer": "A small anchor"
            }))
            .await;
        claim.assert_status(StatusCode::CREATED);
        respond(&server, finder, &id_of(&claim), "accept").await.assert_status_ok();

        let overview = server
            .get("/api/v1/user/items")
            .add_header(AUTHORIZATION, bearer(owner))
            .await
            .json::<Value>();

        assert_eq!(overview["lost_items"][0]["claimed"], true);
        assert_eq!(overview["successful_returns"].as_array().map(Vec::len), Some(1));
        assert_eq!(overview["successful_returns"][0]["found_item_id"], json!(found_id));
    }
}
