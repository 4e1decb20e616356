pub mod geo;
pub mod point;

pub use geo::speed_kmh;
pub use point::{Coordinate, RoutePoint};
