mod config;
mod core;
mod input;
mod playback;
mod ui;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use config::Settings;
use playback::{Command, ManualScheduler, PlaybackEngine, PlaybackSession, Snapshot};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::{Frame, Input};

#[derive(Parser, Debug)]
#[command(name = "route-replay", about = "Replay a recorded GPS route with play/pause/reset and variable speed")]
struct Args {
    /// Route file (JSON array or CSV); the built-in sample route is used if it is missing or unreadable
    #[arg(long)]
    route: Option<PathBuf>,

    /// Initial speed multiplier, e.g. 0.5, 2 or 10x
    #[arg(long, value_parser = ui::parse_speed)]
    speed: Option<f64>,

    /// Start playing immediately
    #[arg(long)]
    autoplay: bool,

    /// Print snapshots as JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Play the whole route in virtual time and print every step without waiting
    #[arg(long)]
    simulate: bool,

    /// Settings file to use instead of the one in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Where rendered frames go
struct Output {
    json: bool,
}

impl Output {
    fn frame(&self, elapsed: Duration, snapshot: &Snapshot) -> Result<()> {
        if self.json {
            let frame = Frame {
                elapsed_ms: elapsed.as_millis() as u64,
                snapshot,
            };
            println!("{}", serde_json::to_string(&frame)?);
        } else {
            println!("{}\n", ui::render(snapshot));
        }
        Ok(())
    }

    fn message(&self, text: &str) {
        // keep stdout parseable in JSON mode
        if self.json {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the route to the end in virtual time
fn simulate(points: Vec<core::RoutePoint>, speed: f64, output: &Output) -> Result<()> {
    let mut engine = PlaybackEngine::with_route(points, ManualScheduler::new());
    engine.set_speed(speed);
    engine.play();

    output.frame(Duration::ZERO, &engine.snapshot())?;
    while let Some(at) = engine.step() {
        output.frame(at, &engine.snapshot())?;
    }

    info!(
        points = engine.route().len(),
        index = engine.position(),
        speed = engine.speed(),
        "simulation finished"
    );
    Ok(())
}

/// Play the route on the wall clock, taking commands from stdin
///
/// Ends on `quit`, Ctrl-C, or once stdin is closed and playback has stopped.
async fn run_interactive(points: Vec<core::RoutePoint>, speed: f64, autoplay: bool, output: &Output) -> Result<()> {
    let handle = PlaybackSession::spawn(points, speed);
    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let start = Instant::now();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    output.message(ui::HELP);
    let first = snapshots.borrow_and_update().clone();
    output.frame(start.elapsed(), &first)?;

    if autoplay {
        handle.send(Command::Play).await;
    }

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break; // Session ended
                }
                let snapshot = snapshots.borrow_and_update().clone();
                output.frame(start.elapsed(), &snapshot)?;

                if !stdin_open && !snapshot.is_playing {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match ui::parse_input(&line, handle.snapshot().speed_multiplier) {
                    Input::Command(command) => {
                        handle.send(command).await;
                    }
                    Input::Help => output.message(ui::HELP),
                    Input::Quit => break,
                    Input::Invalid(reason) if reason.is_empty() => {}
                    Input::Invalid(reason) => output.message(&reason),
                },
                None => {
                    stdin_open = false;
                    if !handle.snapshot().is_playing {
                        break;
                    }
                }
            },
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(Settings::config_path);
    let loaded = match &config_path {
        Some(path) => Settings::load_from(path),
        None => Ok(None),
    };
    let settings = match &loaded {
        Ok(Some(settings)) => settings.clone(),
        _ => Settings::default(),
    };

    init_logging(&settings.log_filter);
    if let Err(e) = &loaded {
        warn!(error = %e, "ignoring settings file");
    }

    let route_path = args.route.or(settings.route_path);
    let speed = args.speed.unwrap_or(settings.speed);
    let autoplay = args.autoplay || settings.autoplay;

    let route = input::load_or_fallback(route_path.as_deref()).await;
    info!(source = ?route.source, points = route.points.len(), speed, "starting playback");

    let output = Output { json: args.json };
    if args.simulate {
        simulate(route.points, speed, &output)
    } else {
        run_interactive(route.points, speed, autoplay, &output).await
    }
}
