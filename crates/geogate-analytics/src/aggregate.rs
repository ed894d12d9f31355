//! Risk aggregation: per-actor and global assessments plus
//! deterministic recommendations derived from the fired rules.

use std::collections::{BTreeMap, BTreeSet};

use geogate_core::models::analytics::{RiskAssessment, RiskLevel, RiskScope};
use geogate_core::models::audit::AuditEvent;

use crate::rules::{RuleKind, RuleMatch};
use crate::statistical::FlaggedEvents;

/// Suspicious-to-total ratio thresholds, per scope.
const ACTOR_HIGH_RATIO: f64 = 0.30;
const ACTOR_MEDIUM_RATIO: f64 = 0.15;
const GLOBAL_HIGH_RATIO: f64 = 0.20;
const GLOBAL_MEDIUM_RATIO: f64 = 0.10;

/// Per-actor assessments reported for at most this many actors.
const MAX_REPORTED_ACTORS: usize = 10;

fn risk_level(suspicious: usize, total: usize, high: f64, medium: f64) -> RiskLevel {
    if total == 0 {
        return RiskLevel::Low;
    }
    let ratio = suspicious as f64 / total as f64;
    if ratio > high {
        RiskLevel::High
    } else if ratio > medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Union of event indices implicated by any finding, per actor and
/// overall.
pub struct SuspiciousIndex {
    pub global: BTreeSet<usize>,
    pub per_actor: BTreeMap<String, BTreeSet<usize>>,
}

pub fn index_suspicious(
    events: &[AuditEvent],
    flagged: &FlaggedEvents,
    rule_matches: &[RuleMatch],
) -> SuspiciousIndex {
    let mut global = BTreeSet::new();
    let mut per_actor: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();

    for &(idx, _) in flagged {
        global.insert(idx);
        per_actor
            .entry(events[idx].actor_id.clone())
            .or_default()
            .insert(idx);
    }
    for m in rule_matches {
        for &idx in &m.event_indices {
            global.insert(idx);
            per_actor.entry(m.actor_id.clone()).or_default().insert(idx);
        }
    }

    SuspiciousIndex { global, per_actor }
}

/// Global assessment over the whole window.
pub fn global_assessment(events: &[AuditEvent], index: &SuspiciousIndex) -> RiskAssessment {
    RiskAssessment {
        scope: RiskScope::Global,
        total_events: events.len(),
        suspicious_count: index.global.len(),
        risk_level: risk_level(
            index.global.len(),
            events.len(),
            GLOBAL_HIGH_RATIO,
            GLOBAL_MEDIUM_RATIO,
        ),
        recommendations: Vec::new(),
    }
}

/// Per-actor assessments for every actor with at least one event,
/// capped to the riskiest for reporting.
pub fn actor_assessments(
    events: &[AuditEvent],
    index: &SuspiciousIndex,
) -> BTreeMap<String, RiskAssessment> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        *totals.entry(event.actor_id.as_str()).or_insert(0) += 1;
    }

    let mut assessments: Vec<(String, RiskAssessment)> = totals
        .into_iter()
        .map(|(actor, total)| {
            let suspicious = index.per_actor.get(actor).map(|s| s.len()).unwrap_or(0);
            (
                actor.to_string(),
                RiskAssessment {
                    scope: RiskScope::Actor,
                    total_events: total,
                    suspicious_count: suspicious,
                    risk_level: risk_level(suspicious, total, ACTOR_HIGH_RATIO, ACTOR_MEDIUM_RATIO),
                    recommendations: Vec::new(),
                },
            )
        })
        .collect();

    // Riskiest first: ratio descending, then suspicious count.
    assessments.sort_by(|a, b| {
        let ratio = |r: &RiskAssessment| r.suspicious_count as f64 / r.total_events.max(1) as f64;
        ratio(&b.1)
            .total_cmp(&ratio(&a.1))
            .then(b.1.suspicious_count.cmp(&a.1.suspicious_count))
    });
    assessments.truncate(MAX_REPORTED_ACTORS);

    assessments.into_iter().collect()
}

/// Deterministic recommendations from which detectors fired.
pub fn recommendations(rule_matches: &[RuleMatch], statistical_count: usize) -> Vec<String> {
    let mut out = Vec::new();

    if statistical_count > 0 || !rule_matches.is_empty() {
        out.push("Review flagged activities in detail".to_string());
    }
    if rule_matches.iter().any(|m| m.rule == RuleKind::BruteForce) {
        out.push(
            "Possible brute force attack detected - review authentication logs \
             and rotate affected credentials"
                .to_string(),
        );
    }
    if rule_matches.iter().any(|m| m.rule == RuleKind::RapidAccess) {
        out.push("Investigate rapid resource access patterns".to_string());
    }
    if rule_matches
        .iter()
        .any(|m| m.rule == RuleKind::LocationDispersion)
    {
        out.push("Verify recent access locations with the affected actors".to_string());
    }
    if rule_matches.iter().any(|m| m.rule == RuleKind::OffHours) {
        out.push("Confirm off-hours access was authorized".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_thresholds_are_exclusive() {
        // Exactly at the threshold is not above it.
        assert_eq!(risk_level(30, 100, 0.30, 0.15), RiskLevel::Medium);
        assert_eq!(risk_level(31, 100, 0.30, 0.15), RiskLevel::High);
        assert_eq!(risk_level(15, 100, 0.30, 0.15), RiskLevel::Low);
        assert_eq!(risk_level(16, 100, 0.30, 0.15), RiskLevel::Medium);
        assert_eq!(risk_level(0, 0, 0.30, 0.15), RiskLevel::Low);
    }

    #[test]
    fn recommendations_follow_fired_rules() {
        assert!(recommendations(&[], 0).is_empty());

        let brute = RuleMatch {
            rule: RuleKind::BruteForce,
            actor_id: "bob".into(),
            event_indices: vec![0],
            description: String::new(),
        };
        let recs = recommendations(&[brute], 0);
        assert!(recs.iter().any(|r| r.contains("brute force")));
    }
}
