//! Access policy domain model.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The single active access policy: geofence center and radius, the
/// permitted local network, and the allowed working-hours window.
///
/// Exactly one policy is active at any time. Updates replace the whole
/// record atomically — there are no partial patch semantics — and take
/// effect for subsequent decisions only, never retroactively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    /// Office latitude in degrees, valid range ±90.
    pub office_latitude: f64,
    /// Office longitude in degrees, valid range ±180.
    pub office_longitude: f64,
    /// Geofence radius in meters; access passes when distance ≤ radius
    /// (inclusive boundary).
    pub radius_meters: f64,
    /// Identifier of the permitted local network, matched
    /// case-insensitively.
    pub allowed_network_id: String,
    /// Start of the allowed working-hours window (UTC, inclusive).
    pub work_start: NaiveTime,
    /// End of the allowed working-hours window (UTC, inclusive). May be
    /// earlier than `work_start` for a window that wraps midnight.
    pub work_end: NaiveTime,
    pub updated_at: DateTime<Utc>,
}

impl PolicyConfig {
    /// The bootstrap policy installed when no policy record exists yet.
    pub fn bootstrap_default() -> Self {
        Self {
            office_latitude: 10.8505,
            office_longitude: 76.2711,
            radius_meters: 500.0,
            allowed_network_id: "OfficeWiFi".into(),
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            updated_at: Utc::now(),
        }
    }

    /// Whether a UTC time-of-day falls inside the working-hours window,
    /// inclusive on both bounds. A window whose start is after its end
    /// wraps midnight (e.g. 22:00–06:00).
    pub fn within_work_hours(&self, time: NaiveTime) -> bool {
        if self.work_start <= self.work_end {
            self.work_start <= time && time <= self.work_end
        } else {
            time >= self.work_start || time <= self.work_end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn work_hours_inclusive_bounds() {
        let policy = PolicyConfig::bootstrap_default();
        assert!(policy.within_work_hours(hms(9, 0)));
        assert!(policy.within_work_hours(hms(17, 0)));
        assert!(policy.within_work_hours(hms(12, 30)));
        assert!(!policy.within_work_hours(hms(8, 59)));
        assert!(!policy.within_work_hours(hms(17, 1)));
    }

    #[test]
    fn work_hours_wrap_midnight() {
        let policy = PolicyConfig {
            work_start: hms(22, 0),
            work_end: hms(6, 0),
            ..PolicyConfig::bootstrap_default()
        };
        assert!(policy.within_work_hours(hms(23, 15)));
        assert!(policy.within_work_hours(hms(3, 0)));
        assert!(policy.within_work_hours(hms(22, 0)));
        assert!(policy.within_work_hours(hms(6, 0)));
        assert!(!policy.within_work_hours(hms(12, 0)));
    }
}
