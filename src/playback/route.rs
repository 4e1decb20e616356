use crate::core::{Coordinate, RoutePoint};
use std::sync::Arc;

/// The loaded route, immutable for the rest of the session
///
/// Cloning is cheap; clones share the same samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteStore {
    points: Arc<[RoutePoint]>,
}

impl RouteStore {
    pub fn new(points: Vec<RoutePoint>) -> Self {
        Self {
            points: points.into(),
        }
    }

    /// Get total number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the final point, or 0 for an empty route
    pub fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&RoutePoint> {
        self.points.get(index)
    }

    /// Coordinates of the first `count` points (all of them if `count` exceeds the length)
    pub fn coordinates(&self, count: usize) -> Vec<Coordinate> {
        self.points.iter().take(count).map(RoutePoint::coordinate).collect()
    }
}

impl From<Vec<RoutePoint>> for RouteStore {
    fn from(points: Vec<RoutePoint>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::fallback_route;

    #[test]
    fn test_empty_route() {
        let route = RouteStore::default();
        assert!(route.is_empty());
        assert_eq!(route.len(), 0);
        assert_eq!(route.last_index(), 0);
        assert!(route.get(0).is_none());
        assert!(route.coordinates(10).is_empty());
    }

    #[test]
    fn test_indexed_access() {
        let route = RouteStore::from(fallback_route());
        assert_eq!(route.len(), 6);
        assert_eq!(route.last_index(), 5);
        assert_eq!(route.get(5).map(|p| p.latitude), Some(26.87));
        assert!(route.get(6).is_none());
    }

    #[test]
    fn test_coordinates_prefix() {
        let route = RouteStore::from(fallback_route());
        let prefix = route.coordinates(2);
        assert_eq!(prefix, vec![Coordinate::new(26.8467, 80.9462), Coordinate::new(26.85, 80.95)]);
        assert_eq!(route.coordinates(usize::MAX).len(), 6);
    }

    #[test]
    fn test_clones_share_points() {
        let route = RouteStore::from(fallback_route());
        let copy = route.clone();
        assert!(Arc::ptr_eq(&route.points, &copy.points));
    }
}
