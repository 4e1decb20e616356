use crate::core::RoutePoint;
use chrono::{Duration, TimeZone, Utc};

/// Coordinates of the built-in sample route, one sample every 30 seconds
const SAMPLE_COORDINATES: [(f64, f64); 6] = [
    (26.8467, 80.9462),
    (26.8500, 80.9500),
    (26.8550, 80.9550),
    (26.8600, 80.9600),
    (26.8650, 80.9650),
    (26.8700, 80.9700),
];

const SAMPLE_SPACING_SECS: i64 = 30;

/// Built-in route used when the configured route cannot be loaded
pub fn fallback_route() -> Vec<RoutePoint> {
    let start = Utc
        .with_ymd_and_hms(2024, 7, 20, 10, 0, 0)
        .single()
        .unwrap_or_default();

    SAMPLE_COORDINATES
        .iter()
        .enumerate()
        .map(|(i, &(lat, lon))| {
            RoutePoint::new(lat, lon, start + Duration::seconds(i as i64 * SAMPLE_SPACING_SECS))
        })
        .collect()
}
