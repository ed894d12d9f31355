//! Work-from-home override domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OverrideStatus {
    Pending,
    Approved,
    Rejected,
}

impl OverrideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideStatus::Pending => "Pending",
            OverrideStatus::Approved => "Approved",
            OverrideStatus::Rejected => "Rejected",
        }
    }
}

/// A time-bounded work-from-home approval for one actor.
///
/// At most one record per actor is pending at a time; a new request
/// supersedes older ones rather than merging with them. Only `Approved`
/// with the current time inside the validity window grants a bypass —
/// `Pending` and `Rejected` never do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WfhOverride {
    pub id: Uuid,
    pub actor_id: String,
    pub status: OverrideStatus,
    /// The actor's stated reason for requesting the override.
    pub reason: String,
    /// Start of the validity window; `None` means unbounded on that side.
    pub window_start: Option<DateTime<Utc>>,
    /// End of the validity window; `None` means unbounded on that side.
    pub window_end: Option<DateTime<Utc>>,
    pub decided_by: Option<String>,
    pub comment: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl WfhOverride {
    /// Whether this override grants a bypass at `now`: approved, and
    /// `now` inside `[window_start, window_end]` treating a missing
    /// bound as open-ended on that side.
    pub fn grants_bypass_at(&self, now: DateTime<Utc>) -> bool {
        if self.status != OverrideStatus::Approved {
            return false;
        }
        if let Some(start) = self.window_start
            && now < start
        {
            return false;
        }
        if let Some(end) = self.window_end
            && now > end
        {
            return false;
        }
        true
    }
}

/// Input for filing a new override request.
#[derive(Debug, Clone)]
pub struct CreateOverride {
    pub actor_id: String,
    pub reason: String,
}

/// An administrator's decision on a pending override request.
#[derive(Debug, Clone)]
pub struct OverrideDecision {
    /// Must be `Approved` or `Rejected`; the transition is terminal.
    pub status: OverrideStatus,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub decided_by: String,
    pub comment: Option<String>,
}
