//! Risk analytics domain model: findings, assessments, and reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FindingKind {
    /// Flagged by the unsupervised outlier scorer.
    Statistical,
    /// Matched by one of the rule-based detectors.
    Rule,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A single flagged anomalous or rule-matching event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Set for rule findings: `brute_force`, `location_dispersion`,
    /// `rapid_access`, `off_hours`.
    pub rule_name: Option<String>,
    pub severity: Severity,
    pub actor_id: String,
    /// Anomaly score; statistical findings only. Higher is more
    /// anomalous.
    pub score: Option<f64>,
    pub description: String,
    /// Timestamp of the implicated event.
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskScope {
    Actor,
    Global,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Coarse risk classification for one scope, derived from the ratio of
/// suspicious to total events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub scope: RiskScope,
    pub total_events: usize,
    /// Count of events implicated in at least one finding.
    pub suspicious_count: usize,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

/// Output of one analytics batch over a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_events: usize,
    pub suspicious_count: usize,
    pub risk_level: RiskLevel,
    /// Statistical findings, sorted descending by anomaly score and
    /// capped for reporting.
    pub findings: Vec<Finding>,
    pub rule_findings: Vec<Finding>,
    /// Per-actor assessments for the riskiest actors in the window.
    pub per_actor: BTreeMap<String, RiskAssessment>,
    pub recommendations: Vec<String>,
    /// Set when the window held too few events for statistical scoring.
    /// An empty `findings` list under this flag is not "all clear".
    pub insufficient_data: bool,
    pub analyzed_at: DateTime<Utc>,
}
