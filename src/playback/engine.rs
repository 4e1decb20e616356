use crate::playback::scheduler::tick_interval;
use crate::playback::{ManualScheduler, PlaybackState, RouteStore, Scheduler, Snapshot, TimerId};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Playback engine for a recorded route
///
/// Owns the playback state and at most one running timer. Every control
/// operation is infallible: empty routes, stale ticks and bad speed values
/// all degrade to no-ops.
pub struct PlaybackEngine<S: Scheduler> {
    route: RouteStore,
    state: PlaybackState,
    active_timer: Option<TimerId>,
    scheduler: S,
}

impl<S: Scheduler> PlaybackEngine<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            route: RouteStore::default(),
            state: PlaybackState::default(),
            active_timer: None,
            scheduler,
        }
    }

    pub fn with_route(route: impl Into<RouteStore>, scheduler: S) -> Self {
        let mut engine = Self::new(scheduler);
        engine.load(route);
        engine
    }

    /// Replace the route and rewind to its first point
    ///
    /// The speed multiplier is kept.
    pub fn load(&mut self, route: impl Into<RouteStore>) {
        self.stop_timer();
        self.route = route.into();
        self.state.current_index = 0;
        debug!(points = self.route.len(), "route loaded into engine");
    }

    /// Start playback
    ///
    /// At the final point this rewinds to the start and plays from there.
    /// Routes with fewer than two points have nothing to play and stay stopped.
    pub fn play(&mut self) {
        if self.state.is_playing {
            return;
        }

        if self.state.current_index >= self.route.last_index() {
            self.reset();
            if self.route.len() < 2 {
                debug!(points = self.route.len(), "nothing to play");
                return;
            }
        }

        self.start_timer();
        debug!(index = self.state.current_index, speed = self.state.speed_multiplier, "playing");
    }

    /// Pause playback at the current point
    pub fn pause(&mut self) {
        if self.state.is_playing {
            self.stop_timer();
            debug!(index = self.state.current_index, "paused");
        }
    }

    /// Stop playback and rewind to the first point
    pub fn reset(&mut self) {
        self.stop_timer();
        self.state.current_index = 0;
        debug!("reset");
    }

    /// Change the speed multiplier, restarting the timer at the new interval if playing
    ///
    /// Non-positive and non-finite values are ignored.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            warn!(multiplier, "ignoring invalid speed multiplier");
            return;
        }

        self.state.speed_multiplier = multiplier;
        if self.state.is_playing {
            self.start_timer();
        }
        debug!(multiplier, interval_ms = tick_interval(multiplier).as_millis() as u64, "speed changed");
    }

    /// Advance one point in response to a timer tick
    ///
    /// Ticks from a timer that is no longer active are dropped.
    pub fn on_tick(&mut self, id: TimerId) {
        if self.active_timer != Some(id) {
            debug!(?id, "dropping tick from inactive timer");
            return;
        }

        let last = self.route.last_index();
        if self.state.current_index < last {
            self.state.current_index += 1;
        }

        if self.state.current_index >= last {
            self.stop_timer();
            info!(index = self.state.current_index, "reached end of route");
        }
    }

    /// Cancel any running timer; called on teardown
    pub fn shutdown(&mut self) {
        self.stop_timer();
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn position(&self) -> usize {
        self.state.current_index
    }

    pub fn speed(&self) -> f64 {
        self.state.speed_multiplier
    }

    pub fn route(&self) -> &RouteStore {
        &self.route
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::derive(&self.route, &self.state)
    }

    /// Replace the running timer (if any) with one at the current speed
    fn start_timer(&mut self) {
        if let Some(old) = self.active_timer.take() {
            self.scheduler.cancel(old);
        }

        let interval = tick_interval(self.state.speed_multiplier);
        self.active_timer = Some(self.scheduler.schedule_repeating(interval));
        self.state.is_playing = true;
        debug_assert_eq!(self.scheduler.active_timers(), 1, "more than one playback timer running");
    }

    fn stop_timer(&mut self) {
        if let Some(id) = self.active_timer.take() {
            self.scheduler.cancel(id);
        }
        self.state.is_playing = false;
    }
}

impl PlaybackEngine<ManualScheduler> {
    /// Run virtual time forward by `span`, delivering every tick that falls due
    ///
    /// Returns the number of ticks delivered.
    #[cfg(test)]
    pub fn advance(&mut self, span: Duration) -> usize {
        let deadline = self.scheduler.now() + span;
        let mut ticks = 0;

        while let Some(id) = self.scheduler.pop_due(deadline) {
            self.on_tick(id);
            ticks += 1;
        }

        self.scheduler.advance_to(deadline);
        ticks
    }

    /// Deliver the next pending tick, whenever it falls due
    ///
    /// Returns the virtual time of the tick, or `None` if no timer is running.
    pub fn step(&mut self) -> Option<Duration> {
        let due = self.scheduler.next_fire()?;
        let id = self.scheduler.pop_due(due)?;
        self.on_tick(id);
        Some(due)
    }
}

impl<S: Scheduler> Drop for PlaybackEngine<S> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
