//! Audit log domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditCategory {
    /// A resource-access decision recorded by the decision engine.
    ResourceAccess,
    /// An authentication event reported by the external auth subsystem
    /// (`login`, `login_failed`, `otp_failed`).
    Authentication,
}

impl AuditCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditCategory::ResourceAccess => "ResourceAccess",
            AuditCategory::Authentication => "Authentication",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,
    Failure,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "Success",
            AuditOutcome::Failure => "Failure",
        }
    }
}

/// One immutable entry in the append-only audit log.
///
/// Ordering is monotonic per writer via `(writer_id, sequence)`; there
/// is no total order across writers. Queries order by wall-clock
/// `timestamp` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: Uuid,
    /// Identity of the log writer that appended this event.
    pub writer_id: Uuid,
    /// Monotonic sequence number within `writer_id`.
    pub sequence: u64,
    pub actor_id: String,
    /// Absent for pure authentication events.
    pub resource_id: Option<String>,
    pub category: AuditCategory,
    /// e.g. `access`, `download`, `login`, `login_failed`, `otp_failed`.
    pub action: String,
    pub outcome: AuditOutcome,
    pub reason: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub network_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Input for appending an event; `id`, `writer_id`, and `sequence` are
/// stamped by the log writer.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub actor_id: String,
    pub resource_id: Option<String>,
    pub category: AuditCategory,
    pub action: String,
    pub outcome: AuditOutcome,
    pub reason: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub network_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A wall-clock window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Filter for audit log queries. Results are ordered timestamp-ascending
/// within the range.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub actor_id: Option<String>,
    pub category: Option<AuditCategory>,
    pub outcome: Option<AuditOutcome>,
    pub range: Option<TimeRange>,
    pub limit: Option<u64>,
}
