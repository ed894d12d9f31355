//! Great-circle distance math for geofence evaluation.

/// Earth's mean radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distance in meters between two coordinates, via the haversine formula.
///
/// Symmetric in its arguments and zero for identical points. Coordinate
/// range validation is the caller's responsibility — out-of-range input
/// is rejected upstream before any distance is computed.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero() {
        assert_eq!(distance_meters(10.8505, 76.2711, 10.8505, 76.2711), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_meters(10.8505, 76.2711, 51.5074, -0.1278);
        let ba = distance_meters(51.5074, -0.1278, 10.8505, 76.2711);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn known_distance_paris_london() {
        // Paris (48.8566, 2.3522) to London (51.5074, -0.1278) is
        // roughly 344 km great-circle.
        let d = distance_meters(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((d - 344_000.0).abs() < 2_000.0, "got {d}");
    }

    #[test]
    fn small_offset_is_small() {
        // ~0.0045 degrees of latitude is ~500 m.
        let d = distance_meters(10.8505, 76.2711, 10.8550, 76.2711);
        assert!(d > 450.0 && d < 550.0, "got {d}");
    }
}
