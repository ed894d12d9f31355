//! Rule-based detectors for known suspicious patterns.
//!
//! All four rules always run, independently, stateless over the
//! window. Each match carries the indices of the implicated events so
//! aggregation can attribute them to actors.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveTime, Weekday};
use chrono::{Datelike, Timelike};
use geogate_core::models::analytics::Severity;
use geogate_core::models::audit::{AuditCategory, AuditEvent, AuditOutcome};

/// Failed authentication events within the rolling window that fire
/// the brute-force rule.
const BRUTE_FORCE_THRESHOLD: usize = 5;
const BRUTE_FORCE_WINDOW_SECS: i64 = 300;

/// Located resource-access events needed before dispersion applies,
/// and the coordinate variance (deg²) that trips it.
const DISPERSION_MIN_EVENTS: usize = 4;
const DISPERSION_VARIANCE_THRESHOLD: f64 = 0.01;

/// Resource-access events within the rolling window that fire the
/// rapid-access rule.
const RAPID_ACCESS_THRESHOLD: usize = 3;
const RAPID_ACCESS_WINDOW_SECS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    BruteForce,
    LocationDispersion,
    RapidAccess,
    OffHours,
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::BruteForce => "brute_force",
            RuleKind::LocationDispersion => "location_dispersion",
            RuleKind::RapidAccess => "rapid_access",
            RuleKind::OffHours => "off_hours",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RuleKind::BruteForce => Severity::High,
            RuleKind::LocationDispersion | RuleKind::RapidAccess => Severity::Medium,
            RuleKind::OffHours => Severity::Low,
        }
    }
}

/// One rule match: which rule, whose behavior, and which events.
#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub rule: RuleKind,
    pub actor_id: String,
    /// Indices into the analyzed window of the implicated events.
    pub event_indices: Vec<usize>,
    pub description: String,
}

/// Run all four detectors over the window.
pub fn detect_all(events: &[AuditEvent]) -> Vec<RuleMatch> {
    let mut matches = Vec::new();
    matches.extend(detect_brute_force(events));
    matches.extend(detect_location_dispersion(events));
    matches.extend(detect_rapid_access(events));
    matches.extend(detect_off_hours(events));
    matches
}

fn by_actor<'a>(
    events: &'a [AuditEvent],
    filter: impl Fn(&AuditEvent) -> bool,
) -> BTreeMap<&'a str, Vec<usize>> {
    let mut grouped: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, event) in events.iter().enumerate() {
        if filter(event) {
            grouped.entry(event.actor_id.as_str()).or_default().push(i);
        }
    }
    grouped
}

/// Find the first run of `threshold` events within `window` among the
/// timestamp-ascending indices, returning the implicated slice.
fn rolling_window_hit(
    events: &[AuditEvent],
    indices: &[usize],
    threshold: usize,
    window: Duration,
) -> Option<Vec<usize>> {
    if indices.len() < threshold {
        return None;
    }
    for start in 0..=(indices.len() - threshold) {
        let end = start + threshold - 1;
        let span = events[indices[end]].timestamp - events[indices[start]].timestamp;
        if span <= window {
            return Some(indices[start..=end].to_vec());
        }
    }
    None
}

/// Brute force: ≥5 failed authentication events inside a rolling
/// 5-minute sub-window for one actor.
fn detect_brute_force(events: &[AuditEvent]) -> Vec<RuleMatch> {
    let failures = by_actor(events, |e| {
        e.category == AuditCategory::Authentication && e.outcome == AuditOutcome::Failure
    });

    failures
        .into_iter()
        .filter_map(|(actor, indices)| {
            rolling_window_hit(
                events,
                &indices,
                BRUTE_FORCE_THRESHOLD,
                Duration::seconds(BRUTE_FORCE_WINDOW_SECS),
            )
            .map(
                |hit| RuleMatch {
                    rule: RuleKind::BruteForce,
                    actor_id: actor.into(),
                    description: format!(
                        "{} failed authentication attempts within 5 minutes for {actor}",
                        hit.len()
                    ),
                    event_indices: hit,
                },
            )
        })
        .collect()
}

fn population_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Location dispersion: an actor's located resource accesses are
/// spread over a suspiciously wide area.
fn detect_location_dispersion(events: &[AuditEvent]) -> Vec<RuleMatch> {
    let located = by_actor(events, |e| {
        e.category == AuditCategory::ResourceAccess
            && e.latitude.is_some()
            && e.longitude.is_some()
    });

    located
        .into_iter()
        .filter_map(|(actor, indices)| {
            if indices.len() < DISPERSION_MIN_EVENTS {
                return None;
            }
            let lats: Vec<f64> = indices.iter().filter_map(|&i| events[i].latitude).collect();
            let lons: Vec<f64> = indices.iter().filter_map(|&i| events[i].longitude).collect();
            let lat_var = population_variance(&lats);
            let lon_var = population_variance(&lons);

            if lat_var > DISPERSION_VARIANCE_THRESHOLD || lon_var > DISPERSION_VARIANCE_THRESHOLD {
                Some(RuleMatch {
                    rule: RuleKind::LocationDispersion,
                    actor_id: actor.into(),
                    description: format!(
                        "Large geographic variance for {actor} \
                         (lat {lat_var:.4}, lon {lon_var:.4})"
                    ),
                    event_indices: indices,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Rapid access: ≥3 resource accesses inside a rolling 30-second
/// sub-window for one actor.
fn detect_rapid_access(events: &[AuditEvent]) -> Vec<RuleMatch> {
    let accesses = by_actor(events, |e| e.category == AuditCategory::ResourceAccess);

    accesses
        .into_iter()
        .filter_map(|(actor, indices)| {
            rolling_window_hit(
                events,
                &indices,
                RAPID_ACCESS_THRESHOLD,
                Duration::seconds(RAPID_ACCESS_WINDOW_SECS),
            )
            .map(
                |hit| {
                    // `hit` carries at least `threshold` indices.
                    let span =
                        events[hit[hit.len() - 1]].timestamp - events[hit[0]].timestamp;
                    RuleMatch {
                        rule: RuleKind::RapidAccess,
                        actor_id: actor.into(),
                        description: format!(
                            "Rapid resource access: {} accesses in {} seconds for {actor}",
                            hit.len(),
                            span.num_seconds()
                        ),
                        event_indices: hit,
                    }
                },
            )
        })
        .collect()
}

/// Off-hours: a successful resource access before 06:00, after 22:00
/// UTC, or on a weekend. One match per event.
fn detect_off_hours(events: &[AuditEvent]) -> Vec<RuleMatch> {
    let early = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
    let late = NaiveTime::from_hms_opt(22, 0, 0).unwrap();

    events
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.category == AuditCategory::ResourceAccess && e.outcome == AuditOutcome::Success
        })
        .filter(|(_, e)| {
            let time = e.timestamp.time();
            let weekday = e.timestamp.weekday();
            time < early || time > late || weekday == Weekday::Sat || weekday == Weekday::Sun
        })
        .map(|(i, e)| RuleMatch {
            rule: RuleKind::OffHours,
            actor_id: e.actor_id.clone(),
            event_indices: vec![i],
            description: format!(
                "Resource access outside business hours ({:02}:{:02} UTC, {})",
                e.timestamp.hour(),
                e.timestamp.minute(),
                e.timestamp.weekday(),
            ),
        })
        .collect()
}
