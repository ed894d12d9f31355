//! The batch risk analyzer: orchestrates feature scoring, rule
//! detection, and aggregation over one audit log window.

use chrono::Utc;
use geogate_core::error::GeogateResult;
use geogate_core::models::analytics::{AnalysisReport, Finding, FindingKind, Severity};
use geogate_core::models::audit::{AuditQuery, TimeRange};
use geogate_core::repository::AuditLogRepository;
use tracing::info;

use crate::scorer::{MeanZScoreScorer, OutlierScorer};
use crate::statistical::FlaggedEvents;
use crate::{aggregate, rules, statistical};

/// Statistical findings reported per analysis, keeping the report
/// readable; the full flagged set still feeds aggregation.
const MAX_STATISTICAL_FINDINGS: usize = 10;

/// Batch risk analyzer over the audit log.
///
/// Holds no mutable state: every `analyze` call is an independent,
/// pure read, so concurrent analyses over overlapping windows are
/// safe. The analysis yields between phases, so a long scan is
/// cancelled by dropping its future.
pub struct RiskAnalyzer<A: AuditLogRepository> {
    audit_log: A,
    scorer: Box<dyn OutlierScorer>,
}

impl<A: AuditLogRepository> RiskAnalyzer<A> {
    /// Analyzer with the default z-score based outlier scorer.
    pub fn new(audit_log: A) -> Self {
        Self {
            audit_log,
            scorer: Box::new(MeanZScoreScorer),
        }
    }

    /// Analyzer with a custom outlier scorer.
    pub fn with_scorer(audit_log: A, scorer: Box<dyn OutlierScorer>) -> Self {
        Self { audit_log, scorer }
    }

    /// Analyze all audit events inside `window`.
    ///
    /// A store failure aborts the batch with an error rather than
    /// producing a falsely empty report.
    pub async fn analyze(&self, window: TimeRange) -> GeogateResult<AnalysisReport> {
        let events = self
            .audit_log
            .query(AuditQuery {
                range: Some(window),
                ..AuditQuery::default()
            })
            .await?;

        info!(events = events.len(), "Starting risk analysis");

        // Statistical pass. Too few events means no statistical
        // findings at all, never fabricated ones.
        let flagged: Option<FlaggedEvents> = statistical::detect(&events, self.scorer.as_ref());
        let insufficient_data = flagged.is_none();
        let flagged = flagged.unwrap_or_default();

        tokio::task::yield_now().await;

        // Rule-based pass: all four detectors always run.
        let rule_matches = rules::detect_all(&events);

        tokio::task::yield_now().await;

        // Aggregation.
        let index = aggregate::index_suspicious(&events, &flagged, &rule_matches);
        let global = aggregate::global_assessment(&events, &index);
        let per_actor = aggregate::actor_assessments(&events, &index);
        let recommendations = aggregate::recommendations(&rule_matches, flagged.len());

        let findings: Vec<Finding> = flagged
            .iter()
            .take(MAX_STATISTICAL_FINDINGS)
            .map(|&(idx, score)| {
                let event = &events[idx];
                Finding {
                    kind: FindingKind::Statistical,
                    rule_name: None,
                    severity: Severity::Medium,
                    actor_id: event.actor_id.clone(),
                    score: Some(score),
                    description: format!(
                        "Anomalous activity pattern for {} ({} {})",
                        event.actor_id, event.action, event.outcome.as_str(),
                    ),
                    timestamp: event.timestamp,
                }
            })
            .collect();

        let rule_findings: Vec<Finding> = rule_matches
            .iter()
            .map(|m| {
                let last_idx = m.event_indices.last().copied().unwrap_or(0);
                Finding {
                    kind: FindingKind::Rule,
                    rule_name: Some(m.rule.name().into()),
                    severity: m.rule.severity(),
                    actor_id: m.actor_id.clone(),
                    score: None,
                    description: m.description.clone(),
                    timestamp: events
                        .get(last_idx)
                        .map(|e| e.timestamp)
                        .unwrap_or_else(Utc::now),
                }
            })
            .collect();

        info!(
            statistical_findings = findings.len(),
            rule_findings = rule_findings.len(),
            risk_level = ?global.risk_level,
            insufficient_data,
            "Risk analysis complete"
        );

        Ok(AnalysisReport {
            total_events: global.total_events,
            suspicious_count: global.suspicious_count,
            risk_level: global.risk_level,
            findings,
            rule_findings,
            per_actor,
            recommendations,
            insufficient_data,
            analyzed_at: Utc::now(),
        })
    }
}
