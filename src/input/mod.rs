pub mod csv;
pub mod fallback;
pub mod json;

pub use self::csv::parse_csv;
pub use self::fallback::fallback_route;
pub use self::json::parse_json;

use crate::core::RoutePoint;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while reading a route file
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("failed to read route file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON route: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV route: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("could not find column with names: {0}")]
    MissingColumn(String),
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: invalid timestamp {value:?}")]
    InvalidTimestamp { line: usize, value: String },
    #[error("point {index}: coordinate out of range ({latitude}, {longitude})")]
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
    #[error("unknown route format")]
    UnknownFormat,
}

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of route data from its first meaningful bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') => InputFormat::Json,
        Some(_) if is_csv(data) => InputFormat::Csv,
        _ => InputFormat::Unknown,
    }
}

fn is_csv(data: &[u8]) -> bool {
    let sample = &data[..data.len().min(500)];
    match std::str::from_utf8(sample) {
        Ok(text) => text
            .lines()
            .find(|line| !line.trim().is_empty())
            .is_some_and(|header| header.chars().filter(|&c| c == ',').count() >= 2),
        // sample may have been cut inside a multi-byte character
        Err(e) => e.valid_up_to() > 0 && is_csv(&sample[..e.valid_up_to()]),
    }
}

/// Parse route data in any supported format and validate its coordinates
pub fn parse_route(data: &[u8]) -> Result<Vec<RoutePoint>, RouteError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    let points = match detect_format(data) {
        InputFormat::Json => parse_json(data)?,
        InputFormat::Csv => parse_csv(data)?,
        InputFormat::Unknown => return Err(RouteError::UnknownFormat),
    };

    validate(&points)?;
    Ok(points)
}

/// Reject out-of-range coordinates; out-of-order timestamps are only reported
fn validate(points: &[RoutePoint]) -> Result<(), RouteError> {
    if let Some((index, p)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| !p.coordinate().is_valid())
    {
        return Err(RouteError::InvalidCoordinate {
            index,
            latitude: p.latitude,
            longitude: p.longitude,
        });
    }

    let backwards = points
        .windows(2)
        .filter(|pair| pair[1].timestamp < pair[0].timestamp)
        .count();
    if backwards > 0 {
        warn!(backwards, "route timestamps are not monotonic, speed will read 0 on those legs");
    }

    Ok(())
}

/// Load a route file, auto-detecting format
pub fn load_file(path: &Path) -> Result<Vec<RoutePoint>, RouteError> {
    let data = std::fs::read(path)?;
    parse_route(&data)
}

/// Where the active route came from
#[derive(Debug, Clone, PartialEq)]
pub enum RouteSource {
    File(PathBuf),
    Fallback,
}

/// A route ready to hand to the playback engine
#[derive(Debug, Clone)]
pub struct LoadedRoute {
    pub points: Vec<RoutePoint>,
    pub source: RouteSource,
}

/// Read the route at `path`, substituting the built-in sample route on any failure
///
/// Never fails: a missing path, unreadable file or malformed content all
/// produce the fallback route with a warning in the log.
pub async fn load_or_fallback(path: Option<&Path>) -> LoadedRoute {
    let Some(path) = path else {
        info!("no route file configured, using built-in sample route");
        return fallback(None);
    };

    let owned = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || load_file(&owned))
        .await
        .unwrap_or_else(|e| Err(RouteError::Io(std::io::Error::other(e))));

    match result {
        Ok(points) => {
            info!(path = %path.display(), points = points.len(), "route loaded");
            LoadedRoute {
                points,
                source: RouteSource::File(path.to_path_buf()),
            }
        }
        Err(e) => fallback(Some((path, e))),
    }
}

fn fallback(failure: Option<(&Path, RouteError)>) -> LoadedRoute {
    if let Some((path, e)) = failure {
        warn!(path = %path.display(), error = %e, "error loading route data, using built-in sample route");
    }

    LoadedRoute {
        points: fallback_route(),
        source: RouteSource::Fallback,
    }
}
