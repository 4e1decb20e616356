use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Tick interval at 1x speed
pub const BASE_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Fastest allowed tick interval, regardless of speed multiplier
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Slowest allowed tick interval; keeps tiny multipliers from overflowing the clock
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Tick interval for a speed multiplier: `max(100ms, 1000ms / multiplier)`
pub fn tick_interval(speed_multiplier: f64) -> Duration {
    let secs = BASE_TICK_INTERVAL.as_secs_f64() / speed_multiplier;
    if secs.is_nan() {
        return BASE_TICK_INTERVAL;
    }
    Duration::from_secs_f64(secs.clamp(MIN_TICK_INTERVAL.as_secs_f64(), MAX_TICK_INTERVAL.as_secs_f64()))
}

/// Identifies one recurring timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Source of recurring ticks for the playback engine
///
/// Implementations:
/// - `TokioScheduler` for wall-clock playback
/// - `ManualScheduler` for deterministic virtual time
pub trait Scheduler {
    /// Start a timer that fires every `interval`, first one `interval` from now
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId;

    /// Stop a timer. Unknown or already cancelled ids are ignored
    fn cancel(&mut self, id: TimerId);

    /// Number of timers currently running
    fn active_timers(&self) -> usize;
}

#[derive(Debug, Clone)]
struct VirtualTimer {
    id: TimerId,
    interval: Duration,
    next_fire: Duration,
}

/// Scheduler driven by an explicit virtual clock
///
/// Time only moves when the owner asks it to, so tests and simulations can
/// run a whole route instantly and reproducibly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<VirtualTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the scheduler was created
    #[cfg(test)]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Intervals of the running timers, oldest first
    #[cfg(test)]
    pub fn intervals(&self) -> Vec<Duration> {
        self.timers.iter().map(|t| t.interval).collect()
    }

    /// Time of the earliest pending fire
    pub fn next_fire(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.next_fire).min()
    }

    /// Fire the earliest timer due at or before `deadline`
    ///
    /// Moves the clock to the fire time and re-arms the timer. Ties go to
    /// the oldest timer.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<TimerId> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_fire <= deadline)
            .min_by_key(|t| t.next_fire)?;

        self.now = timer.next_fire;
        timer.next_fire += timer.interval;
        Some(timer.id)
    }

    /// Move the clock forward without firing anything
    ///
    /// Timers whose fire time has passed are left pending; call `pop_due`
    /// first to deliver them.
    #[cfg(test)]
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(VirtualTimer {
            id,
            interval,
            next_fire: self.now + interval,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    fn active_timers(&self) -> usize {
        self.timers.len()
    }
}

/// Wall-clock scheduler backed by tokio tasks
///
/// Each timer is a task that pushes its `TimerId` into a channel on every
/// tick; the receiving half goes to whoever owns the engine. Must be used
/// from inside a tokio runtime. All timer tasks are aborted on drop.
pub struct TokioScheduler {
    ticks: mpsc::UnboundedSender<TimerId>,
    timers: HashMap<TimerId, JoinHandle<()>>,
    next_id: u64,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (ticks, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            ticks,
            timers: HashMap::new(),
            next_id: 0,
        };
        (scheduler, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let ticks = self.ticks.clone();
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if ticks.send(id).is_err() {
                    break; // Receiver gone
                }
            }
        });

        self.timers.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.timers.remove(&id) {
            handle.abort();
        }
    }

    fn active_timers(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_interval() {
        assert_eq!(tick_interval(0.5), Duration::from_millis(2000));
        assert_eq!(tick_interval(1.0), Duration::from_millis(1000));
        assert_eq!(tick_interval(2.0), Duration::from_millis(500));
        assert_eq!(tick_interval(5.0), Duration::from_millis(200));
        assert_eq!(tick_interval(10.0), Duration::from_millis(100));
    }

    #[test]
    fn test_tick_interval_bounds() {
        assert_eq!(tick_interval(50.0), MIN_TICK_INTERVAL);
        assert_eq!(tick_interval(f64::INFINITY), MIN_TICK_INTERVAL);
        assert_eq!(tick_interval(1e-300), MAX_TICK_INTERVAL);
    }

    #[test]
    fn test_manual_scheduler_fires_in_order() {
        let mut scheduler = ManualScheduler::new();
        let slow = scheduler.schedule_repeating(Duration::from_millis(300));
        let fast = scheduler.schedule_repeating(Duration::from_millis(200));

        let deadline = Duration::from_millis(600);
        let mut fired = Vec::new();
        while let Some(id) = scheduler.pop_due(deadline) {
            fired.push((scheduler.now().as_millis(), id));
        }

        assert_eq!(
            fired,
            vec![(200, fast), (300, slow), (400, fast), (600, slow), (600, fast)]
        );
    }

    #[test]
    fn test_manual_scheduler_cancel() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.schedule_repeating(Duration::from_millis(100));
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.cancel(id);
        scheduler.cancel(id);
        assert_eq!(scheduler.active_timers(), 0);
        assert!(scheduler.pop_due(Duration::from_secs(10)).is_none());
    }

    #[test]
    fn test_manual_scheduler_starts_from_current_time() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance_to(Duration::from_millis(250));
        scheduler.schedule_repeating(Duration::from_millis(100));

        assert_eq!(scheduler.next_fire(), Some(Duration::from_millis(350)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_ticks() {
        let (mut scheduler, mut ticks) = TokioScheduler::new();
        let start = tokio::time::Instant::now();
        let id = scheduler.schedule_repeating(Duration::from_millis(250));

        for expected in [250, 500, 750] {
            assert_eq!(ticks.recv().await, Some(id));
            assert_eq!(start.elapsed(), Duration::from_millis(expected));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_cancel_stops_ticks() {
        let (mut scheduler, mut ticks) = TokioScheduler::new();
        let id = scheduler.schedule_repeating(Duration::from_millis(100));

        assert_eq!(ticks.recv().await, Some(id));
        scheduler.cancel(id);
        assert_eq!(scheduler.active_timers(), 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(ticks.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_drop_releases_timers() {
        let (mut scheduler, mut ticks) = TokioScheduler::new();
        scheduler.schedule_repeating(Duration::from_millis(100));
        scheduler.schedule_repeating(Duration::from_millis(150));
        drop(scheduler);

        // all senders are gone once the aborted tasks are dropped
        let next = tokio::time::timeout(Duration::from_secs(1), ticks.recv()).await;
        assert_eq!(next, Ok(None));
    }
}
