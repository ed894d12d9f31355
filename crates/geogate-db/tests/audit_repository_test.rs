//! Integration tests for the audit log repository using in-memory
//! SurrealDB.

use chrono::{Duration, TimeZone, Utc};
use geogate_core::models::audit::{
    AuditCategory, AuditOutcome, AuditQuery, NewAuditEvent, TimeRange,
};
use geogate_core::repository::AuditLogRepository;
use geogate_db::repository::SurrealAuditLogRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> (
    SurrealAuditLogRepository<surrealdb::engine::local::Db>,
    Surreal<surrealdb::engine::local::Db>,
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    geogate_db::run_migrations(&db).await.unwrap();
    (SurrealAuditLogRepository::new(db.clone()), db)
}

fn access_event(actor: &str, minute: u32, outcome: AuditOutcome) -> NewAuditEvent {
    NewAuditEvent {
        actor_id: actor.into(),
        resource_id: Some("doc-1".into()),
        category: AuditCategory::ResourceAccess,
        action: "access".into(),
        outcome,
        reason: Some("test".into()),
        latitude: Some(10.8505),
        longitude: Some(76.2711),
        network_id: Some("OfficeWiFi".into()),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 6, 10, minute, 0).unwrap(),
    }
}

fn login_failure(actor: &str, minute: u32) -> NewAuditEvent {
    NewAuditEvent {
        actor_id: actor.into(),
        resource_id: None,
        category: AuditCategory::Authentication,
        action: "login_failed".into(),
        outcome: AuditOutcome::Failure,
        reason: None,
        latitude: None,
        longitude: None,
        network_id: None,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 6, 10, minute, 0).unwrap(),
    }
}

#[tokio::test]
async fn append_stamps_writer_and_monotonic_sequence() {
    let (repo, _db) = setup().await;

    let first = repo.append(access_event("alice", 0, AuditOutcome::Success)).await.unwrap();
    let second = repo.append(access_event("alice", 1, AuditOutcome::Success)).await.unwrap();

    assert_eq!(first.writer_id, repo.writer_id());
    assert_eq!(first.sequence, 0);
    assert_eq!(second.sequence, 1);
}

#[tokio::test]
async fn clones_share_the_sequence_counter() {
    let (repo, _db) = setup().await;
    let clone = repo.clone();

    let a = repo.append(access_event("alice", 0, AuditOutcome::Success)).await.unwrap();
    let b = clone.append(access_event("alice", 1, AuditOutcome::Success)).await.unwrap();

    assert_eq!(a.writer_id, b.writer_id);
    assert_eq!(b.sequence, a.sequence + 1);
}

#[tokio::test]
async fn distinct_writers_do_not_collide() {
    let (repo, db) = setup().await;
    let other = SurrealAuditLogRepository::new(db);

    let a = repo.append(access_event("alice", 0, AuditOutcome::Success)).await.unwrap();
    let b = other.append(access_event("bob", 0, AuditOutcome::Success)).await.unwrap();

    assert_ne!(a.writer_id, b.writer_id);
    // Both start at sequence 0 within their own writer.
    assert_eq!(a.sequence, 0);
    assert_eq!(b.sequence, 0);
}

#[tokio::test]
async fn query_orders_by_timestamp_ascending() {
    let (repo, _db) = setup().await;

    // Append out of wall-clock order.
    repo.append(access_event("alice", 30, AuditOutcome::Success)).await.unwrap();
    repo.append(access_event("alice", 10, AuditOutcome::Success)).await.unwrap();
    repo.append(access_event("alice", 20, AuditOutcome::Failure)).await.unwrap();

    let events = repo.query(AuditQuery::default()).await.unwrap();
    assert_eq!(events.len(), 3);
    for pair in events.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[tokio::test]
async fn query_filters_by_actor_category_and_outcome() {
    let (repo, _db) = setup().await;

    repo.append(access_event("alice", 0, AuditOutcome::Success)).await.unwrap();
    repo.append(access_event("alice", 1, AuditOutcome::Failure)).await.unwrap();
    repo.append(access_event("bob", 2, AuditOutcome::Success)).await.unwrap();
    repo.append(login_failure("bob", 3)).await.unwrap();

    let alice = repo
        .query(AuditQuery {
            actor_id: Some("alice".into()),
            ..AuditQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(alice.len(), 2);

    let auth = repo
        .query(AuditQuery {
            category: Some(AuditCategory::Authentication),
            ..AuditQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0].action, "login_failed");
    assert_eq!(auth[0].resource_id, None);

    let failures = repo
        .query(AuditQuery {
            outcome: Some(AuditOutcome::Failure),
            ..AuditQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(failures.len(), 2);
}

#[tokio::test]
async fn query_respects_the_time_range() {
    let (repo, _db) = setup().await;

    for minute in [0, 15, 30, 45] {
        repo.append(access_event("alice", minute, AuditOutcome::Success))
            .await
            .unwrap();
    }

    let start = Utc.with_ymd_and_hms(2024, 3, 6, 10, 10, 0).unwrap();
    let events = repo
        .query(AuditQuery {
            range: Some(TimeRange::new(start, start + Duration::minutes(25))),
            ..AuditQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(events.len(), 2); // 10:15 and 10:30
}

#[tokio::test]
async fn appended_events_round_trip_location_fields() {
    let (repo, _db) = setup().await;

    let event = repo.append(access_event("alice", 0, AuditOutcome::Success)).await.unwrap();
    assert_eq!(event.latitude, Some(10.8505));
    assert_eq!(event.longitude, Some(76.2711));
    assert_eq!(event.network_id.as_deref(), Some("OfficeWiFi"));
    assert_eq!(event.category, AuditCategory::ResourceAccess);
}
