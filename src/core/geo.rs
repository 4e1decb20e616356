//! Great-circle distance and point-to-point speed.

use crate::core::{Coordinate, RoutePoint};

/// Mean Earth radius used for all distance math
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometres
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push h just past 1 for near-antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Speed needed to travel from `prev` to `curr` in the time between them, in km/h
///
/// Returns 0 when `curr` is not strictly later than `prev`.
pub fn speed_kmh(prev: &RoutePoint, curr: &RoutePoint) -> f64 {
    let dt_secs = (curr.timestamp - prev.timestamp).num_milliseconds() as f64 / 1000.0;
    if dt_secs <= 0.0 {
        return 0.0;
    }

    distance_km(prev.coordinate(), curr.coordinate()) / dt_secs * 3.6
}
