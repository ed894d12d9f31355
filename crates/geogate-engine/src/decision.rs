//! Access decision engine — ordered policy-check evaluation.

use chrono::Utc;
use geogate_core::error::{GeogateError, GeogateResult};
use geogate_core::geo;
use geogate_core::models::audit::{AuditCategory, AuditOutcome, NewAuditEvent};
use geogate_core::models::decision::{
    AccessContext, CheckBreakdown, CheckStatus, Decision, DecisionReason,
};
use geogate_core::models::policy::PolicyConfig;
use geogate_core::repository::{AuditLogRepository, OverrideRepository, PolicyRepository};
use tracing::{error, info};

use crate::context;

/// Access decision engine.
///
/// Generic over repository implementations so the decision layer has
/// no dependency on the database crate. `decide` takes one snapshot of
/// the policy and one of the actor's override record; updates to
/// either are whole-record swaps, so no half-updated state is ever
/// observed.
pub struct DecisionEngine<P, O, A>
where
    P: PolicyRepository,
    O: OverrideRepository,
    A: AuditLogRepository,
{
    policy_repo: P,
    override_repo: O,
    audit_log: A,
}

impl<P, O, A> DecisionEngine<P, O, A>
where
    P: PolicyRepository,
    O: OverrideRepository,
    A: AuditLogRepository,
{
    pub fn new(policy_repo: P, override_repo: O, audit_log: A) -> Self {
        Self {
            policy_repo,
            override_repo,
            audit_log,
        }
    }

    /// Evaluate one access attempt.
    ///
    /// Every invocation — regardless of outcome — appends exactly one
    /// resource-access audit event synchronously before returning. An
    /// audit persistence failure propagates as an error and is never
    /// interpreted as permission granted.
    pub async fn decide(&self, ctx: &AccessContext) -> GeogateResult<Decision> {
        // Malformed input is rejected up front, not audited as a
        // policy failure.
        context::validate(ctx)?;

        // 1. Snapshot the active policy. Missing policy fails closed.
        let policy = match self.policy_repo.get_active().await {
            Ok(policy) => Some(policy),
            Err(GeogateError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };

        let Some(policy) = policy else {
            error!(
                actor_id = %ctx.actor_id,
                resource_id = %ctx.resource_id,
                "No active access policy; denying request"
            );
            let decision = Decision {
                allowed: false,
                reason: Some(DecisionReason::ConfigMissing),
                checks: CheckBreakdown::all_skipped(),
                detail: "No active access policy configured".into(),
            };
            self.audit(ctx, &decision).await?;
            return Ok(decision);
        };

        // 2. Snapshot the actor's override. An approved override whose
        //    window contains the request time bypasses all checks;
        //    supplied location/network are still recorded verbatim.
        let bypass = match self.override_repo.get_active(&ctx.actor_id).await {
            Ok(ovr) => ovr.grants_bypass_at(ctx.timestamp),
            Err(GeogateError::NotFound { .. }) => false,
            Err(e) => return Err(e),
        };

        if bypass {
            info!(
                actor_id = %ctx.actor_id,
                resource_id = %ctx.resource_id,
                "Access granted via work-from-home override"
            );
            let decision = Decision {
                allowed: true,
                reason: Some(DecisionReason::WfhOverride),
                checks: CheckBreakdown::all_skipped(),
                detail: "Work-from-home override active".into(),
            };
            self.audit(ctx, &decision).await?;
            return Ok(decision);
        }

        // 3. Ordered checks: location, network, time. The first
        //    failure names the denial reason, but the full breakdown
        //    is always populated.
        let decision = evaluate_checks(ctx, &policy);

        info!(
            actor_id = %ctx.actor_id,
            resource_id = %ctx.resource_id,
            allowed = decision.allowed,
            detail = %decision.detail,
            "Access decision"
        );

        // 4. Audit before returning, for every outcome.
        self.audit(ctx, &decision).await?;

        Ok(decision)
    }

    async fn audit(&self, ctx: &AccessContext, decision: &Decision) -> GeogateResult<()> {
        self.audit_log
            .append(NewAuditEvent {
                actor_id: ctx.actor_id.clone(),
                resource_id: Some(ctx.resource_id.clone()),
                category: AuditCategory::ResourceAccess,
                action: "access".into(),
                outcome: if decision.allowed {
                    AuditOutcome::Success
                } else {
                    AuditOutcome::Failure
                },
                reason: Some(decision.detail.clone()),
                latitude: ctx.latitude,
                longitude: ctx.longitude,
                network_id: ctx.network_id.clone(),
                timestamp: ctx.timestamp,
            })
            .await?;
        Ok(())
    }
}

/// Run the three policy checks in fixed order against one snapshot.
fn evaluate_checks(ctx: &AccessContext, policy: &PolicyConfig) -> Decision {
    let mut failures: Vec<String> = Vec::new();

    // Location: absent coordinates fail the check (deliberate policy,
    // not a validation error — the geofence cannot be confirmed).
    let location = match (ctx.latitude, ctx.longitude) {
        (Some(lat), Some(lon)) => {
            let distance =
                geo::distance_meters(lat, lon, policy.office_latitude, policy.office_longitude);
            if distance <= policy.radius_meters {
                CheckStatus::Pass
            } else {
                failures.push(format!(
                    "Outside allowed area (distance: {distance:.2}m, max: {}m)",
                    policy.radius_meters
                ));
                CheckStatus::Fail
            }
        }
        _ => {
            failures.push("Location not provided".into());
            CheckStatus::Fail
        }
    };

    // Network: case-insensitive equality with the permitted identifier.
    let network = match &ctx.network_id {
        Some(network_id)
            if network_id.to_lowercase() == policy.allowed_network_id.to_lowercase() =>
        {
            CheckStatus::Pass
        }
        Some(network_id) => {
            failures.push(format!("Unauthorized network ({network_id})"));
            CheckStatus::Fail
        }
        None => {
            failures.push("Network not provided".into());
            CheckStatus::Fail
        }
    };

    // Time: UTC time-of-day against the inclusive working-hours
    // window, with midnight wraparound handled by the policy.
    let now_utc = ctx.timestamp.with_timezone(&Utc).time();
    let time = if policy.within_work_hours(now_utc) {
        CheckStatus::Pass
    } else {
        failures.push(format!(
            "Outside allowed hours (current: {}, allowed: {}-{})",
            now_utc.format("%H:%M"),
            policy.work_start.format("%H:%M"),
            policy.work_end.format("%H:%M"),
        ));
        CheckStatus::Fail
    };

    let checks = CheckBreakdown {
        location,
        network,
        time,
    };
    let allowed = failures.is_empty();

    let reason = if allowed {
        None
    } else if location == CheckStatus::Fail {
        Some(DecisionReason::Location)
    } else if network == CheckStatus::Fail {
        Some(DecisionReason::Network)
    } else {
        Some(DecisionReason::TimeWindow)
    };

    Decision {
        allowed,
        reason,
        checks,
        detail: if allowed {
            "Access granted".into()
        } else {
            failures.join("; ")
        },
    }
}
