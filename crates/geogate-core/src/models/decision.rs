//! Access decision domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request context for a single access attempt. Not persisted; the
/// resulting [`Decision`] is what reaches the audit log.
#[derive(Debug, Clone)]
pub struct AccessContext {
    /// Already-authenticated actor identifier (trusted input).
    pub actor_id: String,
    pub resource_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub network_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AccessContext {
    pub fn new(actor_id: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            resource_id: resource_id.into(),
            latitude: None,
            longitude: None,
            network_id: None,
            timestamp: Utc::now(),
        }
    }
}

/// Result of one policy check within a decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    /// The check was not evaluated because an approved override
    /// bypassed it.
    Skipped,
}

/// Which condition determined the decision outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DecisionReason {
    /// Allowed via an approved work-from-home override.
    WfhOverride,
    /// Denied: outside the geofence or no location supplied.
    Location,
    /// Denied: wrong or missing network.
    Network,
    /// Denied: outside the working-hours window.
    TimeWindow,
    /// Denied: no active policy exists (fail-closed).
    ConfigMissing,
}

/// Per-check breakdown, populated in full even when an early check
/// already determined the denial reason.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckBreakdown {
    pub location: CheckStatus,
    pub network: CheckStatus,
    pub time: CheckStatus,
}

impl CheckBreakdown {
    pub fn all_skipped() -> Self {
        Self {
            location: CheckStatus::Skipped,
            network: CheckStatus::Skipped,
            time: CheckStatus::Skipped,
        }
    }
}

/// The outcome of evaluating one [`AccessContext`] against the active
/// policy and override state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    /// `None` only when allowed because every check passed; otherwise
    /// the override marker or the first failing check in fixed order
    /// (location, network, time).
    pub reason: Option<DecisionReason>,
    pub checks: CheckBreakdown,
    /// Human-readable summary for audit trails and operator debugging.
    pub detail: String,
}
