//! Values derived from a route and a playback state.
//!
//! Every function here is pure and recomputed on each call, so nothing can
//! drift out of step with `current_index`.

use crate::core::{speed_kmh, Coordinate, RoutePoint};
use crate::playback::{PlaybackState, RouteStore};
use serde::Serialize;

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Point under the marker, `None` only for an empty route
    pub current_point: Option<RoutePoint>,
    pub current_index: usize,
    pub total_points: usize,
    /// Route prefix from the start through the current point
    pub traveled_path: Vec<Coordinate>,
    /// Whole route, for the reference line
    pub full_path: Vec<Coordinate>,
    pub progress_percent: f64,
    pub current_speed_kmh: f64,
    pub is_playing: bool,
    pub speed_multiplier: f64,
}

impl Snapshot {
    pub fn derive(route: &RouteStore, state: &PlaybackState) -> Self {
        Self {
            current_point: current_point(route, state).cloned(),
            current_index: state.current_index,
            total_points: route.len(),
            traveled_path: traveled_path(route, state),
            full_path: full_path(route),
            progress_percent: progress_percent(route, state),
            current_speed_kmh: current_speed_kmh(route, state),
            is_playing: state.is_playing,
            speed_multiplier: state.speed_multiplier,
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::derive(&RouteStore::default(), &PlaybackState::default())
    }
}

/// Current route point, falling back to the first point if the index is out of range
pub fn current_point<'a>(route: &'a RouteStore, state: &PlaybackState) -> Option<&'a RoutePoint> {
    route.get(state.current_index).or_else(|| route.get(0))
}

pub fn traveled_path(route: &RouteStore, state: &PlaybackState) -> Vec<Coordinate> {
    route.coordinates(state.current_index.saturating_add(1))
}

pub fn full_path(route: &RouteStore) -> Vec<Coordinate> {
    route.coordinates(route.len())
}

/// Share of the route reached so far, counting the current point as reached
pub fn progress_percent(route: &RouteStore, state: &PlaybackState) -> f64 {
    if route.is_empty() {
        return 0.0;
    }

    let reached = state.current_index.saturating_add(1).min(route.len());
    reached as f64 / route.len() as f64 * 100.0
}

/// Speed over the leg that ends at the current point
pub fn current_speed_kmh(route: &RouteStore, state: &PlaybackState) -> f64 {
    if state.current_index == 0 {
        return 0.0;
    }

    match (route.get(state.current_index - 1), route.get(state.current_index)) {
        (Some(prev), Some(curr)) => speed_kmh(prev, curr),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::fallback_route;

    fn at(index: usize) -> PlaybackState {
        PlaybackState {
            current_index: index,
            ..PlaybackState::default()
        }
    }

    #[test]
    fn test_empty_route_snapshot() {
        let snapshot = Snapshot::default();
        assert!(snapshot.current_point.is_none());
        assert!(snapshot.traveled_path.is_empty());
        assert!(snapshot.full_path.is_empty());
        assert_eq!(snapshot.total_points, 0);
        assert_eq!(snapshot.progress_percent, 0.0);
        assert_eq!(snapshot.current_speed_kmh, 0.0);
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.speed_multiplier, 1.0);
    }

    #[test]
    fn test_start_of_route() {
        let route = RouteStore::from(fallback_route());
        let snapshot = Snapshot::derive(&route, &at(0));

        assert_eq!(snapshot.current_point.as_ref(), route.get(0));
        assert_eq!(snapshot.traveled_path.len(), 1);
        assert_eq!(snapshot.full_path.len(), 6);
        assert!((snapshot.progress_percent - 100.0 / 6.0).abs() < 1e-9);
        assert_eq!(snapshot.current_speed_kmh, 0.0);
    }

    #[test]
    fn test_middle_of_route() {
        let route = RouteStore::from(fallback_route());
        let state = at(2);

        assert_eq!(current_point(&route, &state), route.get(2));
        assert_eq!(traveled_path(&route, &state), route.coordinates(3));
        assert!((progress_percent(&route, &state) - 50.0).abs() < 1e-9);

        let expected = speed_kmh(route.get(1).unwrap(), route.get(2).unwrap());
        assert_eq!(current_speed_kmh(&route, &state), expected);
        assert!(expected > 0.0);
    }

    #[test]
    fn test_end_of_route() {
        let route = RouteStore::from(fallback_route());
        let state = at(5);

        assert_eq!(progress_percent(&route, &state), 100.0);
        assert_eq!(traveled_path(&route, &state), full_path(&route));
    }

    #[test]
    fn test_out_of_range_index_degrades() {
        let route = RouteStore::from(fallback_route());
        let state = at(42);

        assert_eq!(current_point(&route, &state), route.get(0));
        assert_eq!(traveled_path(&route, &state).len(), 6);
        assert_eq!(progress_percent(&route, &state), 100.0);
        assert_eq!(current_speed_kmh(&route, &state), 0.0);
    }

    #[test]
    fn test_single_point_route() {
        let route = RouteStore::from(fallback_route()[..1].to_vec());
        let snapshot = Snapshot::derive(&route, &at(0));

        assert_eq!(snapshot.progress_percent, 100.0);
        assert_eq!(snapshot.current_speed_kmh, 0.0);
        assert_eq!(snapshot.traveled_path, snapshot.full_path);
    }
}
