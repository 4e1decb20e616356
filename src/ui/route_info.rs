use crate::playback::Snapshot;

const TITLE: &str = "Vehicle Movement Simulator";
const PROGRESS_BAR_WIDTH: usize = 30;

/// Route summary: point counts and a progress bar
pub struct RouteInfo;

impl RouteInfo {
    pub fn render(snapshot: &Snapshot) -> String {
        // 1-based for display, 0 when there is nothing loaded
        let current = if snapshot.total_points == 0 {
            0
        } else {
            snapshot.current_index + 1
        };

        format!(
            "{TITLE}\n  Total Points: {}  Current Point: {}\n  [{}] {:5.1}%",
            snapshot.total_points,
            current,
            progress_bar(snapshot.progress_percent, PROGRESS_BAR_WIDTH),
            snapshot.progress_percent,
        )
    }
}

fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}
