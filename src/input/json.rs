use crate::core::RoutePoint;
use crate::input::RouteError;

/// Parse a JSON array of `{latitude, longitude, timestamp}` objects
///
/// Timestamps are ISO-8601 strings; any UTC offset is accepted and
/// normalized to UTC.
pub fn parse_json(data: &[u8]) -> Result<Vec<RoutePoint>, RouteError> {
    Ok(serde_json::from_slice(data)?)
}
