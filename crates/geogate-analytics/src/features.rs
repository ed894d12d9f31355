//! Feature extraction from audit events.
//!
//! One vector per event, in the same order as the input slice. Events
//! are expected in timestamp-ascending order, as the audit log query
//! returns them.

use std::collections::HashMap;

use chrono::{Datelike, Timelike};
use geogate_core::models::audit::{AuditEvent, AuditOutcome};

/// Number of features per event vector.
pub const FEATURE_DIM: usize = 5;

/// Lookback for counting an actor's recent failures, in seconds.
const FAILURE_LOOKBACK_SECS: i64 = 600;

/// Cap on the inter-event gap feature, in seconds (24 hours).
const MAX_GAP_SECS: f64 = 86_400.0;

/// Extract one feature vector per event:
/// `[hour_of_day, day_of_week, recent_failures_for_actor,
///   seconds_since_actor_prev_event, actor_event_count_in_window]`.
pub fn extract(events: &[AuditEvent]) -> Vec<[f64; FEATURE_DIM]> {
    // Per-actor totals over the whole window.
    let mut actor_totals: HashMap<&str, f64> = HashMap::new();
    for event in events {
        *actor_totals.entry(event.actor_id.as_str()).or_insert(0.0) += 1.0;
    }

    let mut prev_by_actor: HashMap<&str, usize> = HashMap::new();
    let mut vectors = Vec::with_capacity(events.len());

    for (i, event) in events.iter().enumerate() {
        let hour = event.timestamp.hour() as f64;
        let day_of_week = event.timestamp.weekday().num_days_from_monday() as f64;

        // Failures by this actor in the preceding lookback window,
        // excluding the event itself.
        let cutoff = event.timestamp - chrono::Duration::seconds(FAILURE_LOOKBACK_SECS);
        let recent_failures = events[..i]
            .iter()
            .filter(|e| {
                e.actor_id == event.actor_id
                    && e.outcome == AuditOutcome::Failure
                    && e.timestamp >= cutoff
            })
            .count() as f64;

        let gap_secs = match prev_by_actor.get(event.actor_id.as_str()) {
            Some(&prev) => {
                let secs = (event.timestamp - events[prev].timestamp).num_seconds() as f64;
                secs.clamp(0.0, MAX_GAP_SECS)
            }
            None => 0.0,
        };
        prev_by_actor.insert(event.actor_id.as_str(), i);

        let frequency = actor_totals
            .get(event.actor_id.as_str())
            .copied()
            .unwrap_or(0.0);

        vectors.push([hour, day_of_week, recent_failures, gap_secs, frequency]);
    }

    vectors
}
