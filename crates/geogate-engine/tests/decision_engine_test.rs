//! Integration tests for the decision engine using in-memory
//! SurrealDB.

use chrono::{TimeZone, Utc};
use geogate_core::GeogateError;
use geogate_core::models::audit::{AuditCategory, AuditOutcome, AuditQuery};
use geogate_core::models::decision::{AccessContext, CheckStatus, DecisionReason};
use geogate_core::models::wfh::{CreateOverride, OverrideDecision, OverrideStatus};
use geogate_core::repository::{AuditLogRepository, OverrideRepository, PolicyRepository};
use geogate_db::repository::{
    SurrealAuditLogRepository, SurrealOverrideRepository, SurrealPolicyRepository,
};
use geogate_engine::DecisionEngine;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

type Db = surrealdb::engine::local::Db;
type Engine = DecisionEngine<
    SurrealPolicyRepository<Db>,
    SurrealOverrideRepository<Db>,
    SurrealAuditLogRepository<Db>,
>;

/// Spin up in-memory DB, run migrations, and wire an engine. The
/// default policy is NOT installed; tests opt in via `bootstrap`.
async fn setup() -> (Engine, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    geogate_db::run_migrations(&db).await.unwrap();

    let engine = DecisionEngine::new(
        SurrealPolicyRepository::new(db.clone()),
        SurrealOverrideRepository::new(db.clone()),
        SurrealAuditLogRepository::new(db.clone()),
    );
    (engine, db)
}

async fn bootstrap(db: &Surreal<Db>) {
    SurrealPolicyRepository::new(db.clone())
        .bootstrap_default()
        .await
        .unwrap();
}

async fn audit_events(db: &Surreal<Db>) -> Vec<geogate_core::models::audit::AuditEvent> {
    SurrealAuditLogRepository::new(db.clone())
        .query(AuditQuery::default())
        .await
        .unwrap()
}

/// Office-coordinates context on a Wednesday at 10:00 UTC, matching
/// network. Default policy: office (10.8505, 76.2711), 500 m,
/// `OfficeWiFi`, 09:00–17:00.
fn office_context() -> AccessContext {
    AccessContext {
        actor_id: "alice".into(),
        resource_id: "doc-1".into(),
        latitude: Some(10.8505),
        longitude: Some(76.2711),
        network_id: Some("OfficeWiFi".into()),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 6, 10, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn scenario_a_at_office_in_hours_is_allowed() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    let decision = engine.decide(&office_context()).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, None);
    assert_eq!(decision.checks.location, CheckStatus::Pass);
    assert_eq!(decision.checks.network, CheckStatus::Pass);
    assert_eq!(decision.checks.time, CheckStatus::Pass);
}

#[tokio::test]
async fn scenario_b_600m_away_is_denied_for_location() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    let mut ctx = office_context();
    // ~600 m north of the office.
    ctx.latitude = Some(10.8559);
    let decision = engine.decide(&ctx).await.unwrap();

    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(DecisionReason::Location));
    assert_eq!(decision.checks.network, CheckStatus::Pass);
    assert_eq!(decision.checks.time, CheckStatus::Pass);
}

#[tokio::test]
async fn scenario_c_approved_override_bypasses_without_location() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    let overrides = SurrealOverrideRepository::new(db.clone());
    let request = overrides
        .create(CreateOverride {
            actor_id: "alice".into(),
            reason: "remote".into(),
        })
        .await
        .unwrap();
    overrides
        .decide(
            request.id,
            OverrideDecision {
                status: OverrideStatus::Approved,
                window_start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                window_end: Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
                decided_by: "admin".into(),
                comment: None,
            },
        )
        .await
        .unwrap();

    let ctx = AccessContext {
        actor_id: "alice".into(),
        resource_id: "doc-1".into(),
        latitude: None,
        longitude: None,
        network_id: None,
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    };
    let decision = engine.decide(&ctx).await.unwrap();

    assert!(decision.allowed);
    assert_eq!(decision.reason, Some(DecisionReason::WfhOverride));
    assert_eq!(decision.checks.location, CheckStatus::Skipped);
    assert_eq!(decision.checks.network, CheckStatus::Skipped);
    assert_eq!(decision.checks.time, CheckStatus::Skipped);
}

#[tokio::test]
async fn override_outside_window_falls_through_to_checks() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    let overrides = SurrealOverrideRepository::new(db.clone());
    let request = overrides
        .create(CreateOverride {
            actor_id: "alice".into(),
            reason: "remote".into(),
        })
        .await
        .unwrap();
    overrides
        .decide(
            request.id,
            OverrideDecision {
                status: OverrideStatus::Approved,
                window_start: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                window_end: Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
                decided_by: "admin".into(),
                comment: None,
            },
        )
        .await
        .unwrap();

    // Request is months after the approved window; regular checks
    // apply and pass at the office.
    let decision = engine.decide(&office_context()).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, None);
    assert_eq!(decision.checks.location, CheckStatus::Pass);
}

#[tokio::test]
async fn pending_override_never_bypasses() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    SurrealOverrideRepository::new(db.clone())
        .create(CreateOverride {
            actor_id: "alice".into(),
            reason: "remote".into(),
        })
        .await
        .unwrap();

    let ctx = AccessContext {
        latitude: None,
        longitude: None,
        network_id: None,
        ..office_context()
    };
    let decision = engine.decide(&ctx).await.unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(DecisionReason::Location));
}

#[tokio::test]
async fn missing_policy_fails_closed() {
    let (engine, db) = setup().await;
    // No bootstrap: the policy store is empty.

    let decision = engine.decide(&office_context()).await.unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(DecisionReason::ConfigMissing));

    // The denial is still audited.
    let events = audit_events(&db).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, AuditOutcome::Failure);
}

#[tokio::test]
async fn every_decide_appends_exactly_one_audit_event() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    engine.decide(&office_context()).await.unwrap();

    let mut denied = office_context();
    denied.network_id = Some("CoffeeShop".into());
    engine.decide(&denied).await.unwrap();

    let events = audit_events(&db).await;
    assert_eq!(events.len(), 2);
    assert!(
        events
            .iter()
            .all(|e| e.category == AuditCategory::ResourceAccess && e.action == "access")
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| e.outcome == AuditOutcome::Success)
            .count(),
        1
    );
}

#[tokio::test]
async fn override_bypass_still_records_supplied_location() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    let overrides = SurrealOverrideRepository::new(db.clone());
    let request = overrides
        .create(CreateOverride {
            actor_id: "alice".into(),
            reason: "remote".into(),
        })
        .await
        .unwrap();
    overrides
        .decide(
            request.id,
            OverrideDecision {
                status: OverrideStatus::Approved,
                window_start: None,
                window_end: None,
                decided_by: "admin".into(),
                comment: None,
            },
        )
        .await
        .unwrap();

    // Far from the office and on the wrong network; recorded verbatim
    // but not evaluated.
    let mut ctx = office_context();
    ctx.latitude = Some(48.8566);
    ctx.longitude = Some(2.3522);
    ctx.network_id = Some("HomeWiFi".into());
    ctx.timestamp = Utc::now();

    let decision = engine.decide(&ctx).await.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, Some(DecisionReason::WfhOverride));

    let events = audit_events(&db).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].latitude, Some(48.8566));
    assert_eq!(events[0].network_id.as_deref(), Some("HomeWiFi"));
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected_and_not_audited() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    let mut ctx = office_context();
    ctx.latitude = Some(123.0);
    let err = engine.decide(&ctx).await.unwrap_err();
    assert!(matches!(err, GeogateError::Validation { .. }));

    // Malformed input is no policy failure — nothing was logged.
    assert!(audit_events(&db).await.is_empty());
}

#[tokio::test]
async fn denial_reason_is_first_failing_check_in_order() {
    let (engine, db) = setup().await;
    bootstrap(&db).await;

    // Wrong network and outside hours: network comes first.
    let mut ctx = office_context();
    ctx.network_id = Some("CoffeeShop".into());
    ctx.timestamp = Utc.with_ymd_and_hms(2024, 3, 6, 20, 0, 0).unwrap();

    let decision = engine.decide(&ctx).await.unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(DecisionReason::Network));
    assert_eq!(decision.checks.location, CheckStatus::Pass);
    assert_eq!(decision.checks.network, CheckStatus::Fail);
    assert_eq!(decision.checks.time, CheckStatus::Fail);
}
