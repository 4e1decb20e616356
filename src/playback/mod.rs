pub mod engine;
pub mod route;
pub mod scheduler;
pub mod session;
pub mod snapshot;

pub use engine::PlaybackEngine;
pub use route::RouteStore;
pub use scheduler::{ManualScheduler, Scheduler, TimerId, TokioScheduler};
pub use session::{Command, PlaybackSession};
pub use snapshot::Snapshot;

/// Playback state owned by the engine; everything else is derived from it on demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Index of the current route point, always within `0..=max(0, len - 1)`
    pub current_index: usize,
    pub is_playing: bool,
    pub speed_multiplier: f64,  // 1.0 = one point per second, 2.0 = two per second
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            speed_multiplier: 1.0,
        }
    }
}
