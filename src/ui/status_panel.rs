use crate::playback::Snapshot;

/// Current position, time, speed and movement status
pub struct StatusPanel;

impl StatusPanel {
    pub fn render(snapshot: &Snapshot) -> String {
        let Some(point) = &snapshot.current_point else {
            return "  Status: Loading...".to_string();
        };

        let status = if snapshot.is_playing { "Moving" } else { "Stopped" };

        format!(
            "  Current Position: {:.6}, {:.6}\n  Timestamp: {}\n  Speed: {:.1} km/h ({}x)\n  Status: {}",
            point.latitude,
            point.longitude,
            point.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            snapshot.current_speed_kmh,
            snapshot.speed_multiplier,
            status,
        )
    }
}
