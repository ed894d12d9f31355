//! Statistical outlier detection over a window of audit events.

use geogate_core::models::audit::AuditEvent;
use tracing::debug;

use crate::features;
use crate::scorer::OutlierScorer;

/// Minimum events required before statistical scoring runs. Below
/// this, findings would be noise fabricated from too little data.
pub const MIN_EVENTS_FOR_STATISTICS: usize = 50;

/// Fraction of the window flagged as anomalous (top scorers).
pub const CONTAMINATION: f64 = 0.10;

/// Events flagged by the scorer: `(event index, anomaly score)`,
/// sorted descending by score.
pub type FlaggedEvents = Vec<(usize, f64)>;

/// Score the window and flag approximately the top `CONTAMINATION`
/// share of events. Returns `None` when the window holds fewer than
/// [`MIN_EVENTS_FOR_STATISTICS`] events — the caller reports
/// `insufficient_data` instead of an empty all-clear.
pub fn detect(events: &[AuditEvent], scorer: &dyn OutlierScorer) -> Option<FlaggedEvents> {
    if events.len() < MIN_EVENTS_FOR_STATISTICS {
        debug!(
            events = events.len(),
            required = MIN_EVENTS_FOR_STATISTICS,
            "Insufficient data for statistical detection"
        );
        return None;
    }

    let vectors = features::extract(events);
    let scores = scorer.score(&vectors);

    let mut indexed: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let flag_count = ((events.len() as f64 * CONTAMINATION).round() as usize).max(1);
    indexed.truncate(flag_count);

    // Zero-score events are indistinguishable from normal; never flag
    // them just to fill the contamination quota.
    indexed.retain(|(_, score)| *score > 0.0);

    Some(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::MeanZScoreScorer;
    use chrono::{Duration, TimeZone, Utc};
    use geogate_core::models::audit::{AuditCategory, AuditOutcome};
    use uuid::Uuid;

    fn routine_event(actor: &str, offset_mins: i64) -> AuditEvent {
        AuditEvent {
            id: Uuid::new_v4(),
            writer_id: Uuid::new_v4(),
            sequence: 0,
            actor_id: actor.into(),
            resource_id: Some("doc-1".into()),
            category: AuditCategory::ResourceAccess,
            action: "access".into(),
            outcome: AuditOutcome::Success,
            reason: None,
            latitude: None,
            longitude: None,
            network_id: None,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 6, 9, 0, 0).unwrap()
                + Duration::minutes(offset_mins),
        }
    }

    #[test]
    fn below_threshold_returns_none() {
        let events: Vec<_> = (0..49).map(|i| routine_event("alice", i * 10)).collect();
        assert!(detect(&events, &MeanZScoreScorer).is_none());
    }

    #[test]
    fn flags_at_most_the_contamination_share() {
        let mut events: Vec<_> = (0..60).map(|i| routine_event("alice", i * 5)).collect();
        // One failure burst at 3 AM stands out on several dimensions.
        events.push(AuditEvent {
            outcome: AuditOutcome::Failure,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap(),
            ..routine_event("mallory", 0)
        });

        let flagged = detect(&events, &MeanZScoreScorer).unwrap();
        assert!(!flagged.is_empty());
        assert!(flagged.len() <= ((events.len() as f64 * CONTAMINATION).round() as usize).max(1));
        // Sorted descending by score.
        for pair in flagged.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
