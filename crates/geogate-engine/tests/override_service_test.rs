//! Integration tests for the override workflow service using
//! in-memory SurrealDB.

use chrono::{TimeZone, Utc};
use geogate_core::GeogateError;
use geogate_core::models::wfh::{OverrideDecision, OverrideStatus};
use geogate_db::repository::SurrealOverrideRepository;
use geogate_engine::OverrideService;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type Db = surrealdb::engine::local::Db;

async fn setup() -> OverrideService<SurrealOverrideRepository<Db>> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    geogate_db::run_migrations(&db).await.unwrap();
    OverrideService::new(SurrealOverrideRepository::new(db))
}

fn approval() -> OverrideDecision {
    OverrideDecision {
        status: OverrideStatus::Approved,
        window_start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        window_end: Some(Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()),
        decided_by: "admin".into(),
        comment: None,
    }
}

#[tokio::test]
async fn request_creates_a_pending_record() {
    let service = setup().await;
    let request = service.request("alice", "working remotely").await.unwrap();

    assert_eq!(request.actor_id, "alice");
    assert_eq!(request.status, OverrideStatus::Pending);
    assert_eq!(request.reason, "working remotely");
    assert!(request.decided_at.is_none());
}

#[tokio::test]
async fn duplicate_pending_request_is_rejected() {
    let service = setup().await;
    service.request("alice", "first").await.unwrap();

    let err = service.request("alice", "second").await.unwrap_err();
    assert!(matches!(err, GeogateError::AlreadyExists { .. }));

    // A different actor is unaffected.
    service.request("bob", "also remote").await.unwrap();
}

#[tokio::test]
async fn approve_then_status_reflects_the_decision() {
    let service = setup().await;
    service.request("alice", "remote week").await.unwrap();

    let decided = service.decide("alice", approval()).await.unwrap();
    assert_eq!(decided.status, OverrideStatus::Approved);
    assert_eq!(decided.decided_by.as_deref(), Some("admin"));
    assert!(decided.decided_at.is_some());

    let latest = service.status("alice").await.unwrap();
    assert_eq!(latest.status, OverrideStatus::Approved);
    assert_eq!(
        latest.window_end,
        Some(Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn rejection_allows_a_fresh_request() {
    let service = setup().await;
    service.request("alice", "remote").await.unwrap();
    service
        .decide(
            "alice",
            OverrideDecision {
                status: OverrideStatus::Rejected,
                window_start: None,
                window_end: None,
                decided_by: "admin".into(),
                comment: Some("on-site week".into()),
            },
        )
        .await
        .unwrap();

    // The terminal decision frees the actor to file again.
    let fresh = service.request("alice", "try again").await.unwrap();
    assert_eq!(fresh.status, OverrideStatus::Pending);
}

#[tokio::test]
async fn deciding_twice_is_an_invalid_transition() {
    let service = setup().await;
    service.request("alice", "remote").await.unwrap();
    service.decide("alice", approval()).await.unwrap();

    let err = service.decide("alice", approval()).await.unwrap_err();
    assert!(matches!(err, GeogateError::InvalidTransition { .. }));
}

#[tokio::test]
async fn decision_cannot_set_status_back_to_pending() {
    let service = setup().await;
    service.request("alice", "remote").await.unwrap();

    let err = service
        .decide(
            "alice",
            OverrideDecision {
                status: OverrideStatus::Pending,
                ..approval()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GeogateError::Validation { .. }));
}

#[tokio::test]
async fn inverted_window_is_rejected() {
    let service = setup().await;
    service.request("alice", "remote").await.unwrap();

    let err = service
        .decide(
            "alice",
            OverrideDecision {
                window_start: Some(Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap()),
                window_end: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                ..approval()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GeogateError::Validation { .. }));
}

#[tokio::test]
async fn deciding_without_any_request_is_not_found() {
    let service = setup().await;
    let err = service.decide("ghost", approval()).await.unwrap_err();
    assert!(matches!(err, GeogateError::NotFound { .. }));
}

#[tokio::test]
async fn list_filters_by_status_and_orders_newest_first() {
    let service = setup().await;
    service.request("alice", "first").await.unwrap();
    service.decide("alice", approval()).await.unwrap();
    service.request("bob", "second").await.unwrap();

    let pending = service
        .list_requests(Some(OverrideStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].actor_id, "bob");

    let all = service.list_requests(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].requested_at >= all[1].requested_at);
}
