pub mod controls;
pub mod route_info;
pub mod status_panel;

pub use controls::{parse_input, parse_speed, Input, HELP};
pub use route_info::RouteInfo;
pub use status_panel::StatusPanel;

use crate::playback::Snapshot;
use serde::Serialize;

/// One rendered frame in JSON-lines output
#[derive(Serialize)]
pub struct Frame<'a> {
    /// Milliseconds since playback output started (virtual time in simulations)
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub snapshot: &'a Snapshot,
}

/// Text rendering of a snapshot: route info followed by the status panel
pub fn render(snapshot: &Snapshot) -> String {
    format!("{}\n{}", RouteInfo::render(snapshot), StatusPanel::render(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::fallback_route;
    use crate::playback::{PlaybackState, RouteStore};

    #[test]
    fn test_frame_json_is_flat() {
        let route = RouteStore::from(fallback_route());
        let snapshot = Snapshot::derive(&route, &PlaybackState::default());
        let frame = Frame {
            elapsed_ms: 250,
            snapshot: &snapshot,
        };

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["elapsed_ms"], 250);
        assert_eq!(value["current_index"], 0);
        assert_eq!(value["is_playing"], false);
        assert_eq!(value["current_point"]["timestamp"], "2024-07-20T10:00:00Z");
        assert_eq!(value["full_path"].as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn test_render_contains_both_panels() {
        let text = render(&Snapshot::default());
        assert!(text.contains("Total Points: 0"));
        assert!(text.contains("Loading..."));
    }
}
