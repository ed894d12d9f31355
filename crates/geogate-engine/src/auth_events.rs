//! Authentication event intake.
//!
//! The external authentication subsystem is trusted to verify
//! identity; it reports its outcomes here so they land in the same
//! audit log the risk analytics read.

use chrono::Utc;
use geogate_core::error::GeogateResult;
use geogate_core::models::audit::{AuditCategory, AuditEvent, AuditOutcome, NewAuditEvent};
use geogate_core::repository::AuditLogRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    LoginFailed,
    OtpFailed,
}

impl AuthAction {
    fn action_str(&self) -> &'static str {
        match self {
            AuthAction::Login => "login",
            AuthAction::LoginFailed => "login_failed",
            AuthAction::OtpFailed => "otp_failed",
        }
    }

    fn outcome(&self) -> AuditOutcome {
        match self {
            AuthAction::Login => AuditOutcome::Success,
            AuthAction::LoginFailed | AuthAction::OtpFailed => AuditOutcome::Failure,
        }
    }
}

/// Records authentication events into the audit log.
pub struct AuthEventRecorder<A: AuditLogRepository> {
    audit_log: A,
}

impl<A: AuditLogRepository> AuthEventRecorder<A> {
    pub fn new(audit_log: A) -> Self {
        Self { audit_log }
    }

    pub async fn record(
        &self,
        actor_id: &str,
        action: AuthAction,
        reason: Option<String>,
    ) -> GeogateResult<AuditEvent> {
        self.audit_log
            .append(NewAuditEvent {
                actor_id: actor_id.into(),
                resource_id: None,
                category: AuditCategory::Authentication,
                action: action.action_str().into(),
                outcome: action.outcome(),
                reason,
                latitude: None,
                longitude: None,
                network_id: None,
                timestamp: Utc::now(),
            })
            .await
    }
}
