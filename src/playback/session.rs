use crate::playback::{PlaybackEngine, RouteStore, Snapshot, TimerId, TokioScheduler};
use std::ops::ControlFlow;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// Maximum queued control commands
const COMMAND_BUFFER: usize = 32;

/// Control command from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Play,
    Pause,
    TogglePlay,
    Reset,
    SetSpeed(f64),
    Shutdown,
}

/// A playback engine running on its own task
///
/// Commands and timer ticks are handled one at a time on that task, and a
/// fresh snapshot is published after each one that changes anything.
pub struct PlaybackSession {
    engine: PlaybackEngine<TokioScheduler>,
    ticks: mpsc::UnboundedReceiver<TimerId>,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Snapshot>,
}

impl PlaybackSession {
    /// Start a session for `route` at the given speed multiplier
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn(route: impl Into<RouteStore>, speed: f64) -> SessionHandle {
        let (scheduler, ticks) = TokioScheduler::new();
        let mut engine = PlaybackEngine::with_route(route, scheduler);
        engine.set_speed(speed);

        let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (snapshots, snapshot_rx) = watch::channel(engine.snapshot());

        let session = Self {
            engine,
            ticks,
            commands,
            snapshots,
        };
        let task = tokio::spawn(session.run());

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        break; // Handle dropped
                    };
                    if self.apply(command).is_break() {
                        break;
                    }
                }
                Some(id) = self.ticks.recv() => self.engine.on_tick(id),
            }

            self.publish();
        }

        self.engine.shutdown();
        self.publish();
        debug!("playback session ended");
    }

    /// Apply one command; `Break` ends the session
    fn apply(&mut self, command: Command) -> ControlFlow<()> {
        debug!(?command, "applying command");
        match command {
            Command::Play => self.engine.play(),
            Command::Pause => self.engine.pause(),
            Command::TogglePlay if self.engine.is_playing() => self.engine.pause(),
            Command::TogglePlay => self.engine.play(),
            Command::Reset => self.engine.reset(),
            Command::SetSpeed(multiplier) => self.engine.set_speed(multiplier),
            Command::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn publish(&self) {
        let snapshot = self.engine.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// Presentation-side handle to a running session
///
/// Dropping the handle ends the session and releases its timer.
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queue a command; returns false if the session has already ended
    pub async fn send(&self, command: Command) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified whenever a new snapshot is published
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stop the session and wait for its task to finish
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown).await;
        let _ = self.task.await;
    }
}
